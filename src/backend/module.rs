//! Module assembler: the package's flat function table and its `init<pkg>` entry point.

use cpybind_core::lang::capi;
use cpybind_core::lang::conventions as names;
use cpybind_core::strings::c_quote;
use cpybind_meta::Package;

use super::streams::Streams;
use super::trampoline;

/// Emit the module method table and initializer of `pkg`.
///
/// The free-function trampolines the table refers to must already have been emitted.
pub fn emit_module(out: &mut Streams, pkg: &Package) {
    let imp = out.imp();

    let mut entries: Vec<String> = pkg.funcs.iter().map(trampoline::method_def_entry).collect();
    entries.push("{NULL, NULL, 0, NULL}        /* Sentinel */".to_string());
    imp.table(
        &format!("static {} {}[]", capi::PY_METHOD_DEF, names::module_method_table(&pkg.name)),
        entries,
    );
    imp.blank_line();

    imp.line(capi::MODINIT_FUNC);
    imp.block(&format!("{}(void)", names::module_init(&pkg.name)), |e| {
        e.linef(format_args!("{} *module = NULL;", capi::PY_OBJECT));
        e.blank_line();

        for s in &pkg.structs {
            e.block(
                &format!("if ({}(&{}) < 0)", capi::TYPE_READY, names::type_object(&s.id)),
                |e| e.line("return;"),
            );
        }
        if !pkg.structs.is_empty() {
            e.blank_line();
        }

        e.linef(format_args!(
            "module = {}({}, {}, {});",
            capi::INIT_MODULE,
            c_quote(&pkg.name),
            names::module_method_table(&pkg.name),
            c_quote(&pkg.doc)
        ));
        e.block("if (module == NULL)", |e| e.line("return;"));

        for s in &pkg.structs {
            let type_object = names::type_object(&s.id);
            e.blank_line();
            e.linef(format_args!("Py_INCREF(&{});", type_object));
            e.linef(format_args!(
                "{}(module, {}, ({}*)&{});",
                capi::MODULE_ADD_OBJECT,
                c_quote(&s.name),
                capi::PY_OBJECT,
                type_object
            ));
        }
    });
    imp.blank_line();
}
