//! Integration tests for the cpybind generation pipeline

use std::fs;
use std::path::Path;

use cpybind::backend::BindError;
use cpybind::cli::ExitCode;
use cpybind::cli::commands;
use cpybind::{BindingGenerator, GenConfig, Generation};
use cpybind_core::lang::scalars::BasicKind;
use cpybind_meta::{Field, Func, Package, StructType, ValueType, load};

/// Helper to run the full pipeline on a metadata file
fn generate_file(path: &Path) -> Vec<Generation> {
    let source = fs::read_to_string(path).unwrap();
    let packages = load::from_json_str(&source).unwrap();
    let generator = BindingGenerator::new();
    packages.iter().map(|pkg| generator.generate(pkg)).collect()
}

fn json_fixtures(dir: &str) -> Vec<std::path::PathBuf> {
    let mut paths: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|e| e == "json"))
        .collect();
    paths.sort();
    paths
}

/// Body of the generated C function `name` (from its signature line to its closing brace)
fn function_body<'a>(c_code: &'a str, name: &str) -> &'a str {
    let header = format!("\n{}(", name);
    let start = c_code
        .match_indices(&header)
        .map(|(i, _)| i)
        .find(|&i| c_code[i..].lines().nth(1).is_some_and(|l| l.ends_with(") {")))
        .unwrap_or_else(|| panic!("no definition of {name}"));
    let end = start + c_code[start..].find("\n}\n").unwrap();
    &c_code[start..end + 3]
}

fn render(pkg: &Package) -> String {
    BindingGenerator::new().try_generate(pkg).unwrap().render()
}

/// Test that all valid fixtures generate without diagnostics
#[test]
fn test_valid_fixtures() {
    for path in json_fixtures("tests/fixtures/valid") {
        for generation in generate_file(&path) {
            assert!(
                generation.is_ok(),
                "Expected {} to bind cleanly, got: {}",
                path.display(),
                generation.errors
            );
        }
    }
}

/// Test that invalid fixtures produce diagnostics but still produce a unit
#[test]
fn test_invalid_fixtures() {
    for path in json_fixtures("tests/fixtures/invalid") {
        let generations = generate_file(&path);
        assert!(
            generations.iter().any(|g| !g.is_ok()),
            "Expected {} to report diagnostics",
            path.display()
        );
        for generation in generations {
            assert!(generation.output.render().contains("PyMODINIT_FUNC"));
        }
    }
}

#[test]
fn test_point_with_sum() {
    let pkg = Package::new("geom").with_struct(
        StructType::new("Point")
            .with_field(Field::new("X", ValueType::int()))
            .with_field(Field::new("Y", ValueType::int()))
            .with_method(Func::new("Sum").result(ValueType::int())),
    );
    let c_code = render(&pkg);

    assert!(c_code.contains("typedef void* GoPy_geom_Point;"));
    assert_eq!(c_code.matches("static PyObject*\n_gopy_geom_Point_getter_").count(), 4); // prototype + definition
    assert_eq!(c_code.matches("static int\n_gopy_geom_Point_setter_").count(), 4);
    assert!(c_code.contains("{\"Sum\", (PyCFunction)gopy_geom_Point_Sum, METH_NOARGS, \"\"},"));
    assert!(c_code.contains("PyModule_AddObject(module, \"Point\", (PyObject*)&_gopy_geom_PointType);"));

    let sum = function_body(&c_code, "gopy_geom_Point_Sum");
    assert!(sum.contains("c_gopy_ret = GoPy_geom_Point_Sum(c_self);"));
    assert!(sum.contains("return Py_BuildValue(\"L\", c_gopy_ret);"));
    assert!(!sum.contains("PyArg_ParseTuple"));
}

#[test]
fn test_add_function() {
    let pkg = Package::new("calc").with_func(
        Func::new("Add")
            .param("a", ValueType::int())
            .param("b", ValueType::int())
            .result(ValueType::int()),
    );
    let c_code = render(&pkg);
    let add = function_body(&c_code, "gopy_calc_Add");
    assert!(add.contains("PyArg_ParseTuple(args, \"LL\", &c_a, &c_b)"));
    assert!(add.contains("c_gopy_ret = GoPy_calc_Add(c_a, c_b);"));
    assert!(add.contains("Py_BuildValue(\"L\", c_gopy_ret)"));
    assert!(c_code.contains("{\"Add\", (PyCFunction)gopy_calc_Add, METH_VARARGS, \"\"},"));
    assert!(c_code.contains("PyMODINIT_FUNC\ninitcalc(void) {"));
}

#[test]
fn test_zero_result_function_returns_none() {
    let pkg = Package::new("log").with_func(Func::new("Print").param("msg", ValueType::string()));
    let c_code = render(&pkg);
    let print = function_body(&c_code, "gopy_log_Print");
    assert!(!print.contains("Py_BuildValue"));
    assert!(print.contains("GoPy_log_Print(c_msg);\n"));
    assert!(print.contains("Py_INCREF(Py_None);\n    return Py_None;"));
}

#[test]
fn test_multi_result_packs_in_order() {
    let pkg = Package::new("mathx").with_func(
        Func::new("DivMod")
            .param("a", ValueType::int())
            .param("b", ValueType::int())
            .result(ValueType::int())
            .result(ValueType::int())
            .result(ValueType::basic(BasicKind::Bool)),
    );
    let c_code = render(&pkg);
    let body = function_body(&c_code, "gopy_mathx_DivMod");
    assert_eq!(body.matches("struct GoPy_mathx_DivMod_return c_gopy_ret;").count(), 1);
    assert!(body.contains("return Py_BuildValue(\"LLB\", c_gopy_ret.r0, c_gopy_ret.r1, c_gopy_ret.r2);"));
}

#[test]
fn test_unexported_field_does_not_consume_an_index() {
    let pkg = Package::new("p").with_struct(
        StructType::new("T")
            .with_field(Field::new("A", ValueType::int()))
            .with_field(Field::new("b", ValueType::int()))
            .with_field(Field::new("C", ValueType::string())),
    );
    let c_code = render(&pkg);
    assert!(c_code.contains("{\"C\", (getter)_gopy_p_T_getter_2, (setter)_gopy_p_T_setter_2, \"doc for C\", NULL},"));
    assert!(!c_code.contains("\"b\""));
    assert!(!c_code.contains("getter_3"));
}

#[test]
fn test_initializer_counts_and_order() {
    let mut pkg = Package::new("zoo");
    for name in ["Ant", "Bee", "Cat"] {
        pkg = pkg.with_struct(StructType::new(name));
    }
    let c_code = render(&pkg);
    let init = function_body(&c_code, "initzoo");
    assert_eq!(init.matches("PyType_Ready(").count(), 3);
    assert_eq!(init.matches("Py_InitModule3(").count(), 1);
    assert_eq!(init.matches("Py_INCREF(&").count(), 3);
    assert_eq!(init.matches("PyModule_AddObject(").count(), 3);

    let ant = init.find("\"Ant\"").unwrap();
    let bee = init.find("\"Bee\"").unwrap();
    let cat = init.find("\"Cat\"").unwrap();
    assert!(ant < bee && bee < cat);
    assert!(init.find("Py_InitModule3").unwrap() < ant);
}

#[test]
fn test_diagnostics_accumulate() {
    let pkg = Package::new("bad")
        .with_struct(
            StructType::new("T")
                .with_field(Field::new("Ch", ValueType::Chan(Box::new(ValueType::int()))))
                .with_field(Field::new("Fn", ValueType::Signature)),
        )
        .with_func(
            Func::new("F")
                .param("z", ValueType::basic(BasicKind::Complex64))
                .result(ValueType::Slice(Box::new(ValueType::int()))),
        );
    let generation = BindingGenerator::new().generate(&pkg);
    let unsupported = generation
        .errors
        .iter()
        .filter(|e| matches!(e, BindError::UnsupportedType { .. }))
        .count();
    assert_eq!(unsupported, 4);
    // Best effort: the unit still contains every symbol.
    let c_code = generation.output.render();
    assert!(c_code.contains("_gopy_bad_T_getter_2"));
    assert!(c_code.contains("gopy_bad_F(PyObject *self, PyObject *args) {"));
    assert!(generation.into_result().is_err());
}

#[test]
fn test_stringer_and_textual_composite() {
    let generations = generate_file(Path::new("tests/fixtures/valid/shapes.json"));
    let c_code = generations[0].output.render();

    let tp_str = function_body(&c_code, "_gopy_shapes_Circle_tp_str");
    assert!(tp_str.contains("return gopy_shapes_Circle_String(self, NULL);"));

    let describe = function_body(&c_code, "gopy_shapes_Describe");
    assert!(describe.contains("PyArg_ParseTuple(args, \"Ks\", (unsigned long long*)&c_c, &cgopy_label)"));
    assert!(describe.contains("c_label = CGoPy_GoString((char*)cgopy_label);"));
    assert!(describe.contains("PyObject *o = Py_BuildValue(\"si\", cgopy_gopy_ret_r0, c_gopy_ret.r1);"));
    let build = describe.find("Py_BuildValue").unwrap();
    let free = describe.find("free((void*)cgopy_gopy_ret_r0);").unwrap();
    assert!(build < free);

    assert!(c_code.contains("\"Center is the parent circle.\""));
    assert!(!c_code.contains("\"radius\""));
}

#[test]
fn test_header_and_indent_configuration() {
    let pkg = Package::new("calc").with_func(Func::new("Zero").result(ValueType::int()));
    let config = GenConfig::new().with_header("_cgo_export").with_indent_width(2);
    let c_code = BindingGenerator::with_config(config).try_generate(&pkg).unwrap().render();
    assert!(c_code.contains("#include \"_cgo_export.h\"\n"));
    assert!(c_code.contains("\n  GoInt c_gopy_ret;\n"));
}

#[test]
fn test_gen_command_writes_one_unit_per_package() {
    let out_dir = std::env::temp_dir().join(format!("cpybind_it_{}", std::process::id()));
    let code = commands::generate_files(
        Path::new("tests/fixtures/valid/two_packages.json"),
        Some(&out_dir),
        &GenConfig::default(),
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let clock = fs::read_to_string(out_dir.join("clock.c")).unwrap();
    let units = fs::read_to_string(out_dir.join("units.c")).unwrap();
    assert!(clock.contains("initclock(void)"));
    assert!(clock.contains("{\"Now\", (PyCFunction)gopy_clock_Now, METH_NOARGS, \"\"},"));
    assert!(clock.contains("{\"Sleep\", (PyCFunction)gopy_clock_Sleep, METH_VARARGS, \"\"},"));
    assert!(units.contains("GoFloat32 c_value;"));
    assert!(units.contains("GoUint8 c_value;"));

    let _ = fs::remove_dir_all(&out_dir);
}

#[test]
fn test_check_command_fails_on_diagnostics() {
    let code = commands::check_metadata(
        Path::new("tests/fixtures/invalid/unsupported_types.json"),
        &GenConfig::default(),
    )
    .unwrap();
    assert_eq!(code, ExitCode::FAILURE);
}
