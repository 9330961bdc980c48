//! CPython 2 C-API spellings used by generated code.
//!
//! Keeping the spellings here means emitters never hand-type API names, and tests can assert on the same constants.

/// Generic boxed-object type.
pub const PY_OBJECT: &str = "PyObject";

/// Type-object record type.
pub const PY_TYPE_OBJECT: &str = "PyTypeObject";

/// Method table entry type.
pub const PY_METHOD_DEF: &str = "PyMethodDef";

/// Getset table entry type.
pub const PY_GETSET_DEF: &str = "PyGetSetDef";

/// Argument-tuple parser.
pub const PARSE_TUPLE: &str = "PyArg_ParseTuple";

/// Boxed-value builder.
pub const BUILD_VALUE: &str = "Py_BuildValue";

/// The "no value" singleton.
pub const NONE: &str = "Py_None";

/// Calling convention for callables taking a positional-argument tuple.
pub const METH_VARARGS: &str = "METH_VARARGS";

/// Calling convention for callables taking no arguments.
pub const METH_NOARGS: &str = "METH_NOARGS";

/// Type readiness check, run once per type in the module initializer.
pub const TYPE_READY: &str = "PyType_Ready";

/// Module creation (CPython 2).
pub const INIT_MODULE: &str = "Py_InitModule3";

/// Registers an object in a module namespace (steals one reference).
pub const MODULE_ADD_OBJECT: &str = "PyModule_AddObject";

/// Function-like macro declaring the module initializer.
pub const MODINIT_FUNC: &str = "PyMODINIT_FUNC";

/// Exception type raised for attribute deletion.
pub const EXC_TYPE_ERROR: &str = "PyExc_TypeError";

/// Default object representation, used when a type has no textual hook.
pub const OBJECT_REPR: &str = "PyObject_Repr";

/// Default type flags.
pub const TPFLAGS_DEFAULT: &str = "Py_TPFLAGS_DEFAULT";

/// Headers included by every generated unit, in order.
pub const INCLUDES: &[&str] = &["Python.h", "structmember.h"];
