//! Math, string and console functions.

use tracing::info;

use nwscript_core::{NativeError, ObjectId, Variable, VariableType};
use nwscript_registry::FunctionContext;

use super::{Table, def, id};
use crate::Runtime;

use VariableType::{Float, Int, Object, String as Str, Void};

pub(super) fn declare(table: &mut Table) {
    table.extend([
        def(id::RANDOM, "Random", Int, &[Int], &[]).with_native(random),
        def(id::PRINT_STRING, "PrintString", Void, &[Str], &[]).with_native(print_string),
        def(
            id::PRINT_FLOAT,
            "PrintFloat",
            Void,
            &[Float, Int, Int],
            &[Variable::Int(18), Variable::Int(9)],
        )
        .with_native(print_float),
        def(
            id::FLOAT_TO_STRING,
            "FloatToString",
            Str,
            &[Float, Int, Int],
            &[Variable::Int(18), Variable::Int(9)],
        )
        .with_native(float_to_string),
        def(id::PRINT_INTEGER, "PrintInteger", Void, &[Int], &[]).with_native(print_integer),
        def(id::PRINT_OBJECT, "PrintObject", Void, &[Object], &[]).with_native(print_object),
        def(id::GET_STRING_LENGTH, "GetStringLength", Int, &[Str], &[])
            .with_native(get_string_length),
        def(id::INT_TO_STRING, "IntToString", Str, &[Int], &[]).with_native(int_to_string),
        def(id::INT_TO_FLOAT, "IntToFloat", Float, &[Int], &[]).with_native(int_to_float),
        def(id::FLOAT_TO_INT, "FloatToInt", Int, &[Float], &[]).with_native(float_to_int),
        def(id::STRING_TO_INT, "StringToInt", Int, &[Str], &[]).with_native(string_to_int),
        def(
            id::SPEAK_STRING,
            "SpeakString",
            Void,
            &[Str, Int],
            &[Variable::Int(0)],
        ),
    ]);
}

fn random(runtime: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let max: i32 = ctx.arg(0)?;
    ctx.set_return(runtime.random(max));
    Ok(())
}

fn print_string(_: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let text: String = ctx.arg(0)?;
    info!(target: "nwscript", "{}", text);
    Ok(())
}

fn print_float(_: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let text = format_float(ctx.arg(0)?, ctx.arg(1)?, ctx.arg(2)?);
    info!(target: "nwscript", "{}", text);
    Ok(())
}

fn float_to_string(_: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let text = format_float(ctx.arg(0)?, ctx.arg(1)?, ctx.arg(2)?);
    ctx.set_return(text);
    Ok(())
}

fn print_integer(_: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let value: i32 = ctx.arg(0)?;
    info!(target: "nwscript", "{}", value);
    Ok(())
}

fn print_object(_: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let object: ObjectId = ctx.arg(0)?;
    info!(target: "nwscript", "{}", object.or_caller(ctx.caller()));
    Ok(())
}

fn get_string_length(_: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let text: String = ctx.arg(0)?;
    ctx.set_return(i32::try_from(text.chars().count()).unwrap_or(i32::MAX));
    Ok(())
}

fn int_to_string(_: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let value: i32 = ctx.arg(0)?;
    ctx.set_return(value.to_string());
    Ok(())
}

fn int_to_float(_: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let value: i32 = ctx.arg(0)?;
    ctx.set_return(value as f32);
    Ok(())
}

fn float_to_int(_: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let value: f32 = ctx.arg(0)?;
    ctx.set_return(value as i32);
    Ok(())
}

fn string_to_int(_: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let text: String = ctx.arg(0)?;
    ctx.set_return(parse_leading_int(&text));
    Ok(())
}

/// `%*.*f` with the width clamped to 0..=18 and decimals to 0..=9.
fn format_float(value: f32, width: i32, decimals: i32) -> String {
    let width = width.clamp(0, 18) as usize;
    let decimals = decimals.clamp(0, 9) as usize;
    format!("{value:>width$.decimals$}")
}

/// Leading optional sign and digits, like `atoi`; 0 if there are none.
fn parse_leading_int(text: &str) -> i32 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(digit - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
