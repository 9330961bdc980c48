//! Field accessor generator: getter/setter pairs and the getset table of a struct.
//!
//! Accessors are numbered by their 1-based ordinal among the struct's *exported* fields, which is also the index the
//! wrapped side uses for `GoPy_<id>_getter_<n>` / `GoPy_<id>_setter_<n>`.

use cpybind_core::lang::capi;
use cpybind_core::lang::conventions as names;
use cpybind_core::strings::c_quote;
use cpybind_meta::{Field, Package, StructType};

use super::c_emitter::CEmitter;
use super::errors::{BindError, BindErrors};
use super::marshal::{self, Marshal, Packed};
use super::streams::{CSignature, Streams};

/// Local base name holding the field value in both accessors.
const VALUE_LOCAL: &str = "value";

/// An exported field and its accessor index.
#[derive(Debug, Clone, Copy)]
pub struct Accessor<'a> {
    pub index: usize,
    pub field: &'a Field,
}

/// Exported fields of `s`, numbered from 1 in declaration order.
pub fn accessors(s: &StructType) -> impl Iterator<Item = Accessor<'_>> {
    s.exported_fields()
        .enumerate()
        .map(|(i, field)| Accessor { index: i + 1, field })
}

/// Emit the getter/setter pair of every exported field of `s`, then its getset table.
///
/// Returns the number of accessor pairs emitted.
pub fn emit_accessors(out: &mut Streams, pkg: &Package, s: &StructType, errors: &mut BindErrors) -> usize {
    out.decl().comment(&format!("tp_getset for {}.{}", pkg.name, s.name));
    out.decl().blank_line();

    let mut entries = Vec::new();
    for acc in accessors(s) {
        let field = acc.field;
        if let Err(reason) = Marshal::support(&field.ty) {
            errors.push(BindError::UnsupportedType {
                context: format!("field {}.{}.{}", pkg.name, s.name, field.name),
                ty: field.ty.to_string(),
                reason,
            });
        }
        let m = Marshal::of(&field.ty, pkg);
        emit_getter(out, pkg, s, acc, &m);
        emit_setter(out, pkg, s, acc, &m);

        let doc = field.doc.clone().unwrap_or_else(|| format!("doc for {}", field.name));
        entries.push(format!(
            "{{{}, (getter){}, (setter){}, {}, NULL}},",
            c_quote(&field.name),
            names::getter(&s.id, acc.index),
            names::setter(&s.id, acc.index),
            c_quote(&doc)
        ));
    }
    let count = entries.len();
    entries.push("{NULL} /* Sentinel */".to_string());

    let imp = out.imp();
    imp.comment(&format!("tp_getset for {}.{}", pkg.name, s.name));
    imp.table(
        &format!("static {} {}[]", capi::PY_GETSET_DEF, names::getset_table(&s.id)),
        entries,
    );
    imp.blank_line();

    tracing::debug!(owner = %s.name, accessors = count, "emitted accessors");
    count
}

fn emit_getter(out: &mut Streams, pkg: &Package, s: &StructType, acc: Accessor<'_>, m: &Marshal) {
    let sig = CSignature::new(
        format!("static {}*", capi::PY_OBJECT),
        names::getter(&s.id, acc.index),
        format!("{} *self, void *closure", names::wrapper_struct(&s.id)),
    );
    let comment = format!("getter for {}.{}.{}", pkg.name, s.name, acc.field.name);
    out.define(Some(&comment), &sig, |e: &mut CEmitter| {
        let local = e.declare_local(VALUE_LOCAL);
        m.declare(e, &local);
        e.blank_line();
        e.linef(format_args!(
            "{} = {}(self->{});",
            names::native_local(&local),
            names::wrapped_getter(&s.id, acc.index),
            names::HANDLE_FIELD
        ));
        marshal::emit_build_return(
            e,
            &[Packed {
                marshal: m,
                native: names::native_local(&local),
                buffer: names::buffer_local(&local),
            }],
        );
    });
}

fn emit_setter(out: &mut Streams, pkg: &Package, s: &StructType, acc: Accessor<'_>, m: &Marshal) {
    let sig = CSignature::new(
        "static int",
        names::setter(&s.id, acc.index),
        format!("{} *self, {} *value, void *closure", names::wrapper_struct(&s.id), capi::PY_OBJECT),
    );
    let comment = format!("setter for {}.{}.{}", pkg.name, s.name, acc.field.name);
    let message = format!("Cannot delete '{}' attribute", acc.field.name);
    out.define(Some(&comment), &sig, |e: &mut CEmitter| {
        let local = e.declare_local(VALUE_LOCAL);
        let tuple = e.declare_local("tuple");
        m.declare(e, &local);
        e.linef(format_args!("{} *{} = NULL;", capi::PY_OBJECT, tuple));
        e.blank_line();

        e.block("if (value == NULL)", |e| {
            e.linef(format_args!(
                "PyErr_SetString({}, {});",
                capi::EXC_TYPE_ERROR,
                c_quote(&message)
            ));
            e.line("return -1;");
        });
        e.blank_line();

        e.linef(format_args!("{} = PyTuple_Pack(1, value);", tuple));
        e.block(&format!("if ({} == NULL)", tuple), |e| e.line("return -1;"));
        e.block(
            &format!(
                "if (!{}({}, {}, {}))",
                capi::PARSE_TUPLE,
                tuple,
                c_quote(m.token()),
                m.parse_addr(&local)
            ),
            |e| {
                e.linef(format_args!("Py_DECREF({});", tuple));
                e.line("return -1;");
            },
        );
        e.linef(format_args!("Py_DECREF({});", tuple));
        if let Some(stmt) = m.after_parse(&local) {
            e.line(&stmt);
        }
        e.blank_line();

        e.linef(format_args!(
            "{}(({})(self->{}), {});",
            names::wrapped_setter(&s.id, acc.index),
            names::handle_type(&s.id),
            names::HANDLE_FIELD,
            m.call_arg(&local)
        ));
        e.line("return 0;");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpybind_meta::ValueType;

    fn point() -> Package {
        Package::new("geom").with_struct(
            StructType::new("Point")
                .with_field(Field::new("X", ValueType::int()))
                .with_field(Field::new("hidden", ValueType::int()))
                .with_field(Field::new("Label", ValueType::string()).with_doc("a \"label\"")),
        )
    }

    fn run(pkg: &Package) -> (String, String, usize, BindErrors) {
        let mut out = Streams::new(4);
        let mut errors = BindErrors::new();
        let count = emit_accessors(&mut out, pkg, &pkg.structs[0], &mut errors);
        let (decl, imp) = out.finish();
        (decl, imp, count, errors)
    }

    #[test]
    fn test_ordinals_skip_unexported_fields() {
        let pkg = point();
        let indices: Vec<_> = accessors(&pkg.structs[0]).map(|a| (a.index, a.field.name.as_str())).collect();
        assert_eq!(indices, vec![(1, "X"), (2, "Label")]);

        let (decl, imp, count, errors) = run(&pkg);
        assert_eq!(count, 2);
        assert!(errors.is_empty());
        assert!(imp.contains("c_value = GoPy_geom_Point_getter_2(self->cgopy);"));
        assert!(!imp.contains("getter_3"));
        assert!(decl.contains("_gopy_geom_Point_setter_2(_gopy_geom_Point *self, PyObject *value, void *closure);"));
    }

    #[test]
    fn test_primitive_getter() {
        let (_, imp, _, _) = run(&point());
        let expected = "\
/* getter for geom.Point.X */
static PyObject*
_gopy_geom_Point_getter_1(_gopy_geom_Point *self, void *closure) {
    GoInt c_value;

    c_value = GoPy_geom_Point_getter_1(self->cgopy);
    return Py_BuildValue(\"L\", c_value);
}
";
        assert!(imp.contains(expected), "{imp}");
    }

    #[test]
    fn test_textual_setter_converts_and_rejects_delete() {
        let (_, imp, _, _) = run(&point());
        assert!(imp.contains("PyErr_SetString(PyExc_TypeError, \"Cannot delete 'Label' attribute\");"));
        assert!(imp.contains("if (!PyArg_ParseTuple(tuple, \"s\", &cgopy_value)) {"));
        assert!(imp.contains("c_value = CGoPy_GoString((char*)cgopy_value);"));
        assert!(imp.contains("GoPy_geom_Point_setter_2((GoPy_geom_Point)(self->cgopy), c_value);"));
    }

    #[test]
    fn test_getset_table() {
        let (_, imp, _, _) = run(&point());
        let expected = "\
static PyGetSetDef _gopy_geom_Point_getsets[] = {
    {\"X\", (getter)_gopy_geom_Point_getter_1, (setter)_gopy_geom_Point_setter_1, \"doc for X\", NULL},
    {\"Label\", (getter)_gopy_geom_Point_getter_2, (setter)_gopy_geom_Point_setter_2, \"a \\\"label\\\"\", NULL},
    {NULL} /* Sentinel */
};
";
        assert!(imp.contains(expected), "{imp}");
    }

    #[test]
    fn test_unsupported_field_is_reported_and_still_emitted() {
        let pkg = Package::new("p").with_struct(
            StructType::new("T").with_field(Field::new("Items", ValueType::Slice(Box::new(ValueType::int())))),
        );
        let (_, imp, count, errors) = run(&pkg);
        assert_eq!(count, 1);
        assert_eq!(errors.len(), 1);
        assert!(imp.contains("void* c_value;"));
        assert!(imp.contains("(unsigned long long*)&c_value"));
    }
}
