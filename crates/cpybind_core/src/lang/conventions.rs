//! Deterministic symbol naming shared by the generator and the cgo export side.
//!
//! Every generated C symbol is derived from a stable identifier (`<package>_<Name>` by default) and, for field
//! accessors, a 1-based index. The cgo side exports the `GoPy_*` entry points under the same names, so both sides
//! must agree exactly.
//!
//! ## Examples
//! ```rust
//! use cpybind_core::lang::conventions as names;
//!
//! assert_eq!(names::type_object("geom_Point"), "_gopy_geom_PointType");
//! assert_eq!(names::wrapped_getter("geom_Point", 2), "GoPy_geom_Point_getter_2");
//! assert_eq!(names::module_init("geom"), "initgeom");
//! ```

/// Converts a `GoString` to a freshly allocated, NUL-terminated `char*` (released with `free`).
pub const TO_C_STRING: &str = "CGoPy_CString";

/// Converts a `char*` to a `GoString`.
pub const FROM_C_STRING: &str = "CGoPy_GoString";

/// Field of the wrapper struct that stores the opaque handle.
pub const HANDLE_FIELD: &str = "cgopy";

/// Reserved local base name of a method receiver.
pub const RECEIVER_LOCAL: &str = "self";

/// Reserved local base name of a function result.
pub const RESULT_LOCAL: &str = "gopy_ret";

/// Method name that provides a type's textual representation.
pub const STRING_METHOD: &str = "String";

/// Handle typedef for a struct (`typedef void* GoPy_<id>`).
pub fn handle_type(id: &str) -> String {
    format!("GoPy_{id}")
}

/// Python-side wrapper struct for a struct.
pub fn wrapper_struct(id: &str) -> String {
    format!("_gopy_{id}")
}

/// Type-object record for a struct.
pub fn type_object(id: &str) -> String {
    format!("_gopy_{id}Type")
}

/// Lifecycle or protocol hook (`new`, `dealloc`, `init`, `tp_str`) of a struct.
pub fn hook(id: &str, hook: &str) -> String {
    format!("_gopy_{id}_{hook}")
}

/// Python-side getter of the `index`-th accessor.
pub fn getter(id: &str, index: usize) -> String {
    format!("_gopy_{id}_getter_{index}")
}

/// Python-side setter of the `index`-th accessor.
pub fn setter(id: &str, index: usize) -> String {
    format!("_gopy_{id}_setter_{index}")
}

/// Getset table of a struct.
pub fn getset_table(id: &str) -> String {
    format!("_gopy_{id}_getsets")
}

/// Method table of a struct.
pub fn method_table(id: &str) -> String {
    format!("_gopy_{id}_methods")
}

/// Zero-argument constructor exported by the wrapped side.
pub fn wrapped_new(id: &str) -> String {
    format!("GoPy_{id}_new")
}

/// Single-field retrieval entry point exported by the wrapped side.
pub fn wrapped_getter(id: &str, index: usize) -> String {
    format!("GoPy_{id}_getter_{index}")
}

/// Single-field mutation entry point exported by the wrapped side.
pub fn wrapped_setter(id: &str, index: usize) -> String {
    format!("GoPy_{id}_setter_{index}")
}

/// Function or method entry point exported by the wrapped side.
pub fn wrapped_func(id: &str) -> String {
    format!("GoPy_{id}")
}

/// cgo carrier struct for a multi-result function.
pub fn result_carrier(id: &str) -> String {
    format!("GoPy_{id}_return")
}

/// Field `index` (0-based) of a result carrier.
pub fn carrier_field(index: usize) -> String {
    format!("r{index}")
}

/// Call trampoline for a function or method.
pub fn trampoline(id: &str) -> String {
    format!("gopy_{id}")
}

/// Flat table of a package's free functions.
pub fn module_method_table(package: &str) -> String {
    format!("cpy_{package}_methods")
}

/// Module initializer located by the CPython 2 import machinery.
pub fn module_init(package: &str) -> String {
    format!("init{package}")
}

/// Native local holding a value on the wrapped side.
pub fn native_local(name: &str) -> String {
    format!("c_{name}")
}

/// Local holding the boxed-side C buffer of a textual value.
pub fn buffer_local(name: &str) -> String {
    format!("cgopy_{name}")
}

/// Default stable identifier of a package-level declaration.
pub fn default_id(package: &str, name: &str) -> String {
    format!("{package}_{name}")
}

/// Default stable identifier of a method.
pub fn default_method_id(package: &str, owner: &str, name: &str) -> String {
    format!("{package}_{owner}_{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_symbols() {
        assert_eq!(handle_type("p_T"), "GoPy_p_T");
        assert_eq!(wrapper_struct("p_T"), "_gopy_p_T");
        assert_eq!(hook("p_T", "dealloc"), "_gopy_p_T_dealloc");
        assert_eq!(getter("p_T", 1), "_gopy_p_T_getter_1");
        assert_eq!(setter("p_T", 3), "_gopy_p_T_setter_3");
        assert_eq!(getset_table("p_T"), "_gopy_p_T_getsets");
    }

    #[test]
    fn test_function_symbols() {
        assert_eq!(trampoline("p_Add"), "gopy_p_Add");
        assert_eq!(wrapped_func("p_Add"), "GoPy_p_Add");
        assert_eq!(result_carrier("p_Div"), "GoPy_p_Div_return");
        assert_eq!(carrier_field(0), "r0");
    }

    #[test]
    fn test_default_ids() {
        assert_eq!(default_id("geom", "Point"), "geom_Point");
        assert_eq!(default_method_id("geom", "Point", "Sum"), "geom_Point_Sum");
    }
}
