//! Method/function binding generator.
//!
//! A trampoline is the boxed-side entry point of one wrapped function or method. Its body always has the same shape:
//!
//! 1. declare native locals (parameters, receiver, result),
//! 2. unwrap the receiver handle,
//! 3. parse the positional arguments with one `PyArg_ParseTuple` call,
//! 4. convert parsed text into native strings,
//! 5. call the wrapped entry point,
//! 6. pack the results with one `Py_BuildValue` call (or return `None`).

use cpybind_core::lang::conventions as names;
use cpybind_core::lang::{c_idents, capi};
use cpybind_core::strings::c_quote;
use cpybind_meta::{Func, Package, StructType};

use super::c_emitter::CEmitter;
use super::errors::{BindError, BindErrors};
use super::marshal::{self, Marshal, Packed, ResultPlan};
use super::streams::{CSignature, Streams};

/// Calling convention of a generated callable: no-argument when the function takes no parameters.
pub fn calling_convention(f: &Func) -> &'static str {
    if f.params.is_empty() {
        capi::METH_NOARGS
    } else {
        capi::METH_VARARGS
    }
}

/// Method-table entry binding `f` under its exported name.
pub fn method_def_entry(f: &Func) -> String {
    format!(
        "{{{}, (PyCFunction){}, {}, {}}},",
        c_quote(&f.name),
        names::trampoline(&f.id),
        calling_convention(f),
        c_quote(&f.doc)
    )
}

/// Local base name of the `i`-th parameter. Blank names and names that are not C identifiers become `arg<i>`.
fn param_base(name: &str, i: usize) -> String {
    if name == "_" || !c_idents::is_identifier(name) {
        format!("arg{}", i)
    } else {
        name.to_string()
    }
}

/// Emit the trampoline of `f`. `owner` is the struct `f` is bound to, if it is a method.
pub fn emit_trampoline(
    out: &mut Streams,
    pkg: &Package,
    owner: Option<&StructType>,
    f: &Func,
    errors: &mut BindErrors,
) {
    let qualified = match owner {
        Some(s) => format!("{}.{}.{}", pkg.name, s.name, f.name),
        None => format!("{}.{}", pkg.name, f.name),
    };
    if owner.is_none() && f.receiver.is_some() {
        errors.push(BindError::ReceiverOnFreeFunction { name: qualified.clone() });
    }
    for (i, p) in f.params.iter().enumerate() {
        if let Err(reason) = Marshal::support(&p.ty) {
            errors.push(BindError::UnsupportedType {
                context: format!("parameter {} of {}", param_base(&p.name, i), qualified),
                ty: p.ty.to_string(),
                reason,
            });
        }
    }
    for (i, r) in f.results.iter().enumerate() {
        if let Err(reason) = Marshal::support(&r.ty) {
            errors.push(BindError::UnsupportedType {
                context: format!("result {} of {}", i, qualified),
                ty: r.ty.to_string(),
                reason,
            });
        }
    }

    let comment = match owner {
        Some(_) => format!("wrapper of {}", qualified),
        None => format!("pythonization of: {}", qualified),
    };
    let sig = CSignature::new(
        format!("static {}*", capi::PY_OBJECT),
        names::trampoline(&f.id),
        format!("{0} *self, {0} *args", capi::PY_OBJECT),
    );
    out.define(Some(&comment), &sig, |e: &mut CEmitter| emit_body(e, pkg, owner, f));
    tracing::debug!(function = %qualified, params = f.params.len(), results = f.results.len(), "emitted trampoline");
}

fn emit_body(e: &mut CEmitter, pkg: &Package, owner: Option<&StructType>, f: &Func) {
    // Reserved locals first, so parameters named `self` or `gopy_ret` are renamed instead of shadowing them.
    let receiver = e.declare_local(names::RECEIVER_LOCAL);
    let result = e.declare_local(names::RESULT_LOCAL);
    let plan = ResultPlan::of(&f.results, pkg);
    // Text buffers of composite results are locals too; reserve them before any parameter can claim the name.
    let carrier_buffers: Vec<Option<String>> = match &plan {
        ResultPlan::Composite(ms) => ms
            .iter()
            .enumerate()
            .map(|(i, m)| {
                m.needs_cleanup()
                    .then(|| e.declare_local(&format!("{}_{}", result, names::carrier_field(i))))
            })
            .collect(),
        _ => Vec::new(),
    };
    let params: Vec<(String, Marshal)> = f
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| (e.declare_local(&param_base(&p.name, i)), Marshal::of(&p.ty, pkg)))
        .collect();

    // 1. declarations
    let mut declared = false;
    if let Some(s) = owner {
        e.linef(format_args!("{} {};", names::handle_type(&s.id), names::native_local(&receiver)));
        declared = true;
    }
    for (local, m) in &params {
        m.declare(e, local);
        declared = true;
    }
    match &plan {
        ResultPlan::None => {}
        ResultPlan::Single(m) => {
            m.declare(e, &result);
            declared = true;
        }
        ResultPlan::Composite(ms) => {
            e.linef(format_args!(
                "struct {} {};",
                names::result_carrier(&f.id),
                names::native_local(&result)
            ));
            for local in carrier_buffers.iter().flatten() {
                e.linef(format_args!("const char* {};", names::buffer_local(local)));
            }
            declared = true;
        }
    }
    if declared {
        e.blank_line();
    }

    // 2. receiver
    if let Some(s) = owner {
        e.linef(format_args!(
            "{} = (({}*)self)->{};",
            names::native_local(&receiver),
            names::wrapper_struct(&s.id),
            names::HANDLE_FIELD
        ));
        e.blank_line();
    }

    // 3. argument parsing
    if !params.is_empty() {
        let format = marshal::format_string(params.iter().map(|(_, m)| m));
        let addrs: Vec<String> = params.iter().map(|(local, m)| m.parse_addr(local)).collect();
        e.block(
            &format!(
                "if (!{}(args, {}, {}))",
                capi::PARSE_TUPLE,
                c_quote(&format),
                addrs.join(", ")
            ),
            |e| e.line("return NULL;"),
        );
        e.blank_line();
    }

    // 4. post-parse conversions
    let fixups: Vec<String> = params.iter().filter_map(|(local, m)| m.after_parse(local)).collect();
    if !fixups.is_empty() {
        for stmt in &fixups {
            e.line(stmt);
        }
        e.blank_line();
    }

    // 5. the call
    let mut args = Vec::with_capacity(params.len() + 1);
    if owner.is_some() {
        args.push(names::native_local(&receiver));
    }
    args.extend(params.iter().map(|(local, m)| m.call_arg(local)));
    let call = format!("{}({})", names::wrapped_func(&f.id), args.join(", "));
    match plan {
        ResultPlan::None => e.linef(format_args!("{};", call)),
        _ => e.linef(format_args!("{} = {};", names::native_local(&result), call)),
    }
    e.blank_line();

    // 6. results
    match &plan {
        ResultPlan::None => {
            e.linef(format_args!("Py_INCREF({});", capi::NONE));
            e.linef(format_args!("return {};", capi::NONE));
        }
        ResultPlan::Single(m) => marshal::emit_build_return(
            e,
            &[Packed {
                marshal: m,
                native: names::native_local(&result),
                buffer: names::buffer_local(&result),
            }],
        ),
        ResultPlan::Composite(ms) => {
            let packed: Vec<Packed<'_>> = ms
                .iter()
                .enumerate()
                .map(|(i, m)| Packed {
                    marshal: m,
                    native: format!("{}.{}", names::native_local(&result), names::carrier_field(i)),
                    buffer: carrier_buffers
                        .get(i)
                        .and_then(|b| b.as_deref())
                        .map(names::buffer_local)
                        .unwrap_or_default(),
                })
                .collect();
            marshal::emit_build_return(e, &packed);
        }
    }
}
