//! Type descriptor generator.
//!
//! Emits everything one exported struct needs on the boxed side: the handle typedef and wrapper struct, the
//! lifecycle hooks, accessors, method trampolines and table, the string hook, and finally the `PyTypeObject` record
//! that ties them together. Every hook the record names is defined here, in the same pass.

use cpybind_core::lang::capi;
use cpybind_core::lang::conventions as names;
use cpybind_core::strings::c_quote;
use cpybind_meta::{Capability, Func, Package, StructType};

use super::accessors;
use super::c_emitter::CEmitter;
use super::errors::{BindError, BindErrors};
use super::marshal::{Marshal, ValueCategory};
use super::streams::{CSignature, Streams};
use super::trampoline;

/// Emit the complete descriptor of `s`.
#[tracing::instrument(skip_all, fields(owner = %s.name, id = %s.id))]
pub fn emit_struct(out: &mut Streams, pkg: &Package, s: &StructType, errors: &mut BindErrors) {
    emit_wrapper_decls(out, pkg, s);

    out.imp().comment(&format!("--- impl for {}.{} ---", pkg.name, s.name));
    out.imp().blank_line();

    emit_new(out, s);
    emit_dealloc(out, s);
    emit_init(out, s);
    accessors::emit_accessors(out, pkg, s, errors);
    emit_methods(out, pkg, s, errors);
    emit_tp_str(out, pkg, s, errors);
    emit_type_object(out, pkg, s);
}

fn emit_wrapper_decls(out: &mut Streams, pkg: &Package, s: &StructType) {
    let decl = out.decl();
    decl.comment(&format!("--- decls for {}.{} ---", pkg.name, s.name));
    decl.linef(format_args!("typedef void* {};", names::handle_type(&s.id)));
    decl.blank_line();
    decl.line("typedef struct {");
    decl.indent();
    decl.line("PyObject_HEAD");
    decl.linef(format_args!("{} {};", names::handle_type(&s.id), names::HANDLE_FIELD));
    decl.dedent();
    decl.linef(format_args!("}} {};", names::wrapper_struct(&s.id)));
    decl.blank_line();
    decl.linef(format_args!(
        "static {} {};",
        capi::PY_TYPE_OBJECT,
        names::type_object(&s.id)
    ));
    decl.blank_line();
}

fn self_params(s: &StructType) -> String {
    format!("{} *self", names::wrapper_struct(&s.id))
}

fn emit_new(out: &mut Streams, s: &StructType) {
    let sig = CSignature::new(
        format!("static {}*", capi::PY_OBJECT),
        names::hook(&s.id, "new"),
        format!("{} *type, {} *args, {} *kwds", capi::PY_TYPE_OBJECT, capi::PY_OBJECT, capi::PY_OBJECT),
    );
    out.define(Some(&format!("tp_new for {}", s.name)), &sig, |e: &mut CEmitter| {
        let wrapper = names::wrapper_struct(&s.id);
        e.linef(format_args!("{0} *self = ({0} *)type->tp_alloc(type, 0);", wrapper));
        e.block("if (self == NULL)", |e| e.line("return NULL;"));
        e.linef(format_args!("self->{} = {}();", names::HANDLE_FIELD, names::wrapped_new(&s.id)));
        e.linef(format_args!("return ({}*)self;", capi::PY_OBJECT));
    });
}

fn emit_dealloc(out: &mut Streams, s: &StructType) {
    let sig = CSignature::new("static void", names::hook(&s.id, "dealloc"), self_params(s));
    out.define(Some(&format!("tp_dealloc for {}", s.name)), &sig, |e: &mut CEmitter| {
        e.linef(format_args!("Py_TYPE(self)->tp_free(({}*)self);", capi::PY_OBJECT));
    });
}

fn emit_init(out: &mut Streams, s: &StructType) {
    let sig = CSignature::new(
        "static int",
        names::hook(&s.id, "init"),
        format!("{} *self, {} *args, {} *kwds", names::wrapper_struct(&s.id), capi::PY_OBJECT, capi::PY_OBJECT),
    );
    out.define(Some(&format!("tp_init for {}", s.name)), &sig, |e: &mut CEmitter| {
        e.line("return 0;");
    });
}

fn emit_methods(out: &mut Streams, pkg: &Package, s: &StructType, errors: &mut BindErrors) {
    out.decl().comment(&format!("methods for {}.{}", pkg.name, s.name));
    out.decl().blank_line();

    let mut entries = Vec::with_capacity(s.methods.len() + 1);
    for m in &s.methods {
        trampoline::emit_trampoline(out, pkg, Some(s), m, errors);
        entries.push(trampoline::method_def_entry(m));
    }
    entries.push("{NULL} /* sentinel */".to_string());

    let imp = out.imp();
    imp.comment(&format!("methods for {}.{}", pkg.name, s.name));
    imp.table(
        &format!("static {} {}[]", capi::PY_METHOD_DEF, names::method_table(&s.id)),
        entries,
    );
    imp.blank_line();
}

/// The `String` method usable as the struct's textual representation: no parameters, one textual result.
pub fn string_method<'a>(pkg: &Package, s: &'a StructType) -> Option<&'a Func> {
    s.method(names::STRING_METHOD).filter(|m| {
        m.params.is_empty()
            && m.results.len() == 1
            && Marshal::of(&m.results[0].ty, pkg).category() == ValueCategory::Textual
    })
}

fn emit_tp_str(out: &mut Streams, pkg: &Package, s: &StructType, errors: &mut BindErrors) {
    let delegate = if s.has_capability(Capability::Stringer) {
        let found = string_method(pkg, s);
        if found.is_none() {
            errors.push(BindError::MissingStringMethod {
                name: format!("{}.{}", pkg.name, s.name),
            });
        }
        found
    } else {
        None
    };

    let sig = CSignature::new(
        format!("static {}*", capi::PY_OBJECT),
        names::hook(&s.id, "tp_str"),
        format!("{} *self", capi::PY_OBJECT),
    );
    out.define(Some(&format!("tp_str for {}", s.name)), &sig, |e: &mut CEmitter| match delegate {
        Some(m) => e.linef(format_args!("return {}(self, NULL);", names::trampoline(&m.id))),
        None => e.linef(format_args!("return {}(self);", capi::OBJECT_REPR)),
    });
}

fn emit_type_object(out: &mut Streams, pkg: &Package, s: &StructType) {
    let slot = |value: String, name: &str| format!("{}, /* {} */", value, name);
    let zero = |name: &str| slot("0".to_string(), name);

    let entries = vec![
        "PyObject_HEAD_INIT(NULL)".to_string(),
        zero("ob_size"),
        slot(c_quote(&format!("{}.{}", pkg.name, s.name)), "tp_name"),
        slot(format!("sizeof({})", names::wrapper_struct(&s.id)), "tp_basicsize"),
        zero("tp_itemsize"),
        slot(format!("(destructor){}", names::hook(&s.id, "dealloc")), "tp_dealloc"),
        zero("tp_print"),
        zero("tp_getattr"),
        zero("tp_setattr"),
        zero("tp_compare"),
        zero("tp_repr"),
        zero("tp_as_number"),
        zero("tp_as_sequence"),
        zero("tp_as_mapping"),
        zero("tp_hash"),
        zero("tp_call"),
        slot(format!("(reprfunc){}", names::hook(&s.id, "tp_str")), "tp_str"),
        zero("tp_getattro"),
        zero("tp_setattro"),
        zero("tp_as_buffer"),
        slot(capi::TPFLAGS_DEFAULT.to_string(), "tp_flags"),
        slot(c_quote(&s.doc), "tp_doc"),
        zero("tp_traverse"),
        zero("tp_clear"),
        zero("tp_richcompare"),
        zero("tp_weaklistoffset"),
        zero("tp_iter"),
        zero("tp_iternext"),
        slot(names::method_table(&s.id), "tp_methods"),
        zero("tp_members"),
        slot(names::getset_table(&s.id), "tp_getset"),
        zero("tp_base"),
        zero("tp_dict"),
        zero("tp_descr_get"),
        zero("tp_descr_set"),
        zero("tp_dictoffset"),
        slot(format!("(initproc){}", names::hook(&s.id, "init")), "tp_init"),
        zero("tp_alloc"),
        slot(names::hook(&s.id, "new"), "tp_new"),
    ];

    let imp = out.imp();
    imp.comment(&format!("type object for {}.{}", pkg.name, s.name));
    imp.table(
        &format!("static {} {}", capi::PY_TYPE_OBJECT, names::type_object(&s.id)),
        entries,
    );
    imp.blank_line();
}
