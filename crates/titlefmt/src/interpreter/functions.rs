//! Built-in function implementations.
//!
//! Control and logic functions are lazy: they evaluate only the arguments
//! they need and report their own flags, so `$if(%missing%,a,b)` yields `b`
//! without dragging the missing field's emptiness along. Everything else is
//! eager and inherits the flags of its arguments in the evaluator.

use std::iter;

use icu_casemap::CaseMapper;
use icu_locale_core::LanguageIdentifier;
use titlefmt_semantics::FunctionId;
use unicode_segmentation::UnicodeSegmentation;

use crate::interpreter::config::MAX_RESULT_LEN;
use crate::interpreter::context::{EvalContext, LazyArgs};
use crate::interpreter::registry::FunctionImpl;
use crate::types::{FieldValue, ScriptResult};

/// Upper bound on widths and repeat counts, so a typo such as
/// `$repeat(x,99999999)` cannot allocate without limit.
const MAX_GENERATED_LEN: usize = 4096;

/// The implementation behind a built-in function.
pub fn builtin(id: FunctionId) -> FunctionImpl {
    match id {
        FunctionId::If => FunctionImpl::Lazy(if_),
        FunctionId::If2 => FunctionImpl::Lazy(if2),
        FunctionId::If3 => FunctionImpl::Lazy(if3),
        FunctionId::IfEqual => FunctionImpl::Lazy(ifequal),
        FunctionId::IfGreater => FunctionImpl::Lazy(ifgreater),
        FunctionId::IfLonger => FunctionImpl::Lazy(iflonger),
        FunctionId::Select => FunctionImpl::Lazy(select),
        FunctionId::And => FunctionImpl::Lazy(and),
        FunctionId::Or => FunctionImpl::Lazy(or),
        FunctionId::Not => FunctionImpl::Lazy(not),
        FunctionId::StrCmp => FunctionImpl::Eager(strcmp),
        FunctionId::StrICmp => FunctionImpl::Eager(stricmp),
        FunctionId::Greater => FunctionImpl::Eager(greater),
        FunctionId::Longer => FunctionImpl::Eager(longer),
        FunctionId::Add => FunctionImpl::Eager(add),
        FunctionId::Sub => FunctionImpl::Eager(sub),
        FunctionId::Mul => FunctionImpl::Eager(mul),
        FunctionId::Div => FunctionImpl::Eager(div),
        FunctionId::Mod => FunctionImpl::Eager(modulo),
        FunctionId::Min => FunctionImpl::Eager(min),
        FunctionId::Max => FunctionImpl::Eager(max),
        FunctionId::Num => FunctionImpl::Eager(num),
        FunctionId::Left => FunctionImpl::Eager(left),
        FunctionId::Right => FunctionImpl::Eager(right),
        FunctionId::Substr => FunctionImpl::Eager(substr),
        FunctionId::Len => FunctionImpl::Eager(len),
        FunctionId::Upper => FunctionImpl::Eager(upper),
        FunctionId::Lower => FunctionImpl::Eager(lower),
        FunctionId::Caps => FunctionImpl::Eager(caps),
        FunctionId::Trim => FunctionImpl::Eager(trim),
        FunctionId::Pad => FunctionImpl::Eager(pad),
        FunctionId::Replace => FunctionImpl::Eager(replace),
        FunctionId::Insert => FunctionImpl::Eager(insert),
        FunctionId::Repeat => FunctionImpl::Eager(repeat),
        FunctionId::Abbr => FunctionImpl::Eager(abbr),
        FunctionId::Crlf => FunctionImpl::Eager(crlf),
        FunctionId::Tab => FunctionImpl::Eager(tab),
        FunctionId::Char => FunctionImpl::Eager(char_),
        FunctionId::Meta => FunctionImpl::Eager(meta),
        FunctionId::MetaSep => FunctionImpl::Eager(meta_sep),
        FunctionId::MetaNum => FunctionImpl::Eager(meta_num),
        FunctionId::TimeMs => FunctionImpl::Eager(timems),
    }
}

// =============================================================================
// Control flow
// =============================================================================

fn if_(args: &LazyArgs<'_, '_>) -> ScriptResult {
    if args.eval(0).is_truthy() {
        args.eval(1)
    } else {
        args.eval(2)
    }
}

fn if2(args: &LazyArgs<'_, '_>) -> ScriptResult {
    let first = args.eval(0);
    if first.is_truthy() { first } else { args.eval(1) }
}

fn if3(args: &LazyArgs<'_, '_>) -> ScriptResult {
    let last = args.len().saturating_sub(1);
    for index in 0..last {
        let candidate = args.eval(index);
        if candidate.is_truthy() {
            return candidate;
        }
    }
    args.eval(last)
}

fn ifequal(args: &LazyArgs<'_, '_>) -> ScriptResult {
    let equal = parse_number(&args.eval(0).value) == parse_number(&args.eval(1).value);
    args.eval(if equal { 2 } else { 3 })
}

fn ifgreater(args: &LazyArgs<'_, '_>) -> ScriptResult {
    let greater = parse_number(&args.eval(0).value) > parse_number(&args.eval(1).value);
    args.eval(if greater { 2 } else { 3 })
}

fn iflonger(args: &LazyArgs<'_, '_>) -> ScriptResult {
    let length = grapheme_len(&args.eval(0).value);
    let longer = i64::try_from(length).unwrap_or(i64::MAX) > parse_number(&args.eval(1).value);
    args.eval(if longer { 2 } else { 3 })
}

/// `$select(n,a1,...)` picks the n-th (1-based) of the remaining arguments.
fn select(args: &LazyArgs<'_, '_>) -> ScriptResult {
    let index = parse_number(&args.eval(0).value);
    match usize::try_from(index) {
        Ok(index) if index >= 1 && index < args.len() => args.eval(index),
        _ => ScriptResult::default(),
    }
}

// =============================================================================
// Logic
// =============================================================================

fn and(args: &LazyArgs<'_, '_>) -> ScriptResult {
    ScriptResult::from_bool((0..args.len()).all(|index| args.eval(index).is_truthy()))
}

fn or(args: &LazyArgs<'_, '_>) -> ScriptResult {
    ScriptResult::from_bool((0..args.len()).any(|index| args.eval(index).is_truthy()))
}

fn not(args: &LazyArgs<'_, '_>) -> ScriptResult {
    ScriptResult::from_bool(!args.eval(0).is_truthy())
}

// =============================================================================
// Comparison
// =============================================================================

fn strcmp(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    ScriptResult::from_bool(text(args, 0) == text(args, 1))
}

fn stricmp(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let mapper = CaseMapper::new();
    let left = mapper.fold_string(text(args, 0)).to_string();
    let right = mapper.fold_string(text(args, 1)).to_string();
    ScriptResult::from_bool(left == right)
}

fn greater(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    ScriptResult::from_bool(number(args, 0) > number(args, 1))
}

fn longer(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    ScriptResult::from_bool(grapheme_len(text(args, 0)) > grapheme_len(text(args, 1)))
}

// =============================================================================
// Arithmetic
// =============================================================================

fn add(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    fold_numbers(args, i64::saturating_add)
}

fn sub(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    fold_numbers(args, i64::saturating_sub)
}

fn mul(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    fold_numbers(args, i64::saturating_mul)
}

/// Division by zero leaves the left operand unchanged.
fn div(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    fold_numbers(args, |acc, n| acc.checked_div(n).unwrap_or(acc))
}

fn modulo(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    fold_numbers(args, |acc, n| acc.checked_rem(n).unwrap_or(acc))
}

fn min(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    fold_numbers(args, i64::min)
}

fn max(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    fold_numbers(args, i64::max)
}

/// `$num(n,len)` zero-pads `n` to `len` characters, sign included.
fn num(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let value = number(args, 0);
    let width = count(args, 1);
    ScriptResult::literal(format!("{value:0width$}"))
}

fn fold_numbers(args: &[ScriptResult], op: impl Fn(i64, i64) -> i64) -> ScriptResult {
    let mut numbers = args.iter().map(|arg| parse_number(&arg.value));
    let first = numbers.next().unwrap_or(0);
    ScriptResult::literal(numbers.fold(first, op).to_string())
}

// =============================================================================
// Text
// =============================================================================

fn left(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let taken: String = text(args, 0).graphemes(true).take(count(args, 1)).collect();
    ScriptResult::literal(taken)
}

fn right(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let graphemes: Vec<&str> = text(args, 0).graphemes(true).collect();
    let skip = graphemes.len().saturating_sub(count(args, 1));
    ScriptResult::literal(graphemes[skip..].concat())
}

/// `$substr(s,from,to)`: graphemes `from` through `to`, 1-based and inclusive.
fn substr(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let from = count(args, 1).max(1);
    let to = count(args, 2);
    if to < from {
        return ScriptResult::default();
    }
    let taken: String = text(args, 0)
        .graphemes(true)
        .skip(from - 1)
        .take(to - from + 1)
        .collect();
    ScriptResult::literal(taken)
}

fn len(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    ScriptResult::literal(grapheme_len(text(args, 0)).to_string())
}

fn upper(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let mapper = CaseMapper::new();
    ScriptResult::literal(
        mapper
            .uppercase_to_string(text(args, 0), &LanguageIdentifier::UNKNOWN)
            .to_string(),
    )
}

fn lower(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let mapper = CaseMapper::new();
    ScriptResult::literal(
        mapper
            .lowercase_to_string(text(args, 0), &LanguageIdentifier::UNKNOWN)
            .to_string(),
    )
}

/// Uppercase the first grapheme of every word and lowercase the rest.
fn caps(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let mapper = CaseMapper::new();
    let lang = LanguageIdentifier::UNKNOWN;
    let mut output = String::new();
    for segment in text(args, 0).split_word_bounds() {
        let mut graphemes = segment.graphemes(true);
        let Some(first) = graphemes.next() else {
            continue;
        };
        output.push_str(&mapper.uppercase_to_string(first, &lang));
        output.push_str(&mapper.lowercase_to_string(graphemes.as_str(), &lang));
    }
    ScriptResult::literal(output)
}

fn trim(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    ScriptResult::literal(text(args, 0).trim())
}

/// `$pad(s,len[,c])` right-pads `s` with `c` (default space) to `len`
/// graphemes.
fn pad(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let value = text(args, 0);
    let width = count(args, 1);
    let fill = text(args, 2).chars().next().unwrap_or(' ');
    let missing = width.saturating_sub(grapheme_len(value));
    let mut output = String::from(value);
    output.extend(iter::repeat_n(fill, missing));
    ScriptResult::literal(output)
}

/// `$replace(s,a,b[,a2,b2...])` applies each replacement pair in order.
/// Replacements that would grow the text past [`MAX_RESULT_LEN`] are skipped.
fn replace(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let mut output = text(args, 0).to_string();
    for pair in args.get(1..).unwrap_or_default().chunks_exact(2) {
        let (from, to) = (pair[0].value.as_str(), pair[1].value.as_str());
        if !from.is_empty() {
            let growth = to.len().saturating_sub(from.len());
            let allowed = MAX_RESULT_LEN
                .saturating_sub(output.len())
                .checked_div(growth)
                .unwrap_or(usize::MAX);
            output = output.replacen(from, to, allowed);
        }
    }
    ScriptResult::literal(output)
}

/// `$insert(s,ins,n)` inserts `ins` after the first `n` graphemes of `s`.
fn insert(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let value = text(args, 0);
    let at = count(args, 2);
    let split = value
        .grapheme_indices(true)
        .nth(at)
        .map_or(value.len(), |(offset, _)| offset);
    let (head, tail) = value.split_at(split);
    ScriptResult::literal(format!("{head}{}{tail}", text(args, 1)))
}

/// `$repeat(s,n)`, limited to as many whole copies as fit in
/// [`MAX_RESULT_LEN`].
fn repeat(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let value = text(args, 0);
    let fits = MAX_RESULT_LEN.checked_div(value.len()).unwrap_or(0);
    ScriptResult::literal(value.repeat(count(args, 1).min(fits)))
}

/// First grapheme of every word that starts with a letter or digit.
fn abbr(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let output: String = text(args, 0)
        .split_whitespace()
        .filter(|word| word.starts_with(char::is_alphanumeric))
        .filter_map(|word| word.graphemes(true).next())
        .collect();
    ScriptResult::literal(output)
}

fn crlf(_args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    ScriptResult::literal("\r\n")
}

/// `$tab()` or `$tab(n)`.
fn tab(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let repeat = if args.is_empty() { 1 } else { count(args, 0) };
    ScriptResult::literal("\t".repeat(repeat))
}

/// `$char(code)`: the character with the given Unicode scalar value.
fn char_(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let code = number(args, 0);
    let value = u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .filter(|c| *c != '\0');
    ScriptResult::literal(value.map(String::from).unwrap_or_default())
}

// =============================================================================
// Record access
// =============================================================================

/// `$meta(field[,index])`: all values joined, or one value by 0-based index.
fn meta(args: &[ScriptResult], ctx: &EvalContext<'_>) -> ScriptResult {
    let values = ctx.metadata().field(text(args, 0)).into_values();
    if values.is_empty() {
        return ScriptResult::missing();
    }
    if args.len() > 1 {
        let index = usize::try_from(number(args, 1)).ok();
        return match index.and_then(|index| values.get(index)) {
            Some(value) => ScriptResult::field(value.clone()),
            None => ScriptResult::missing(),
        };
    }
    ScriptResult::field(values.join(&ctx.config().multi_value_separator))
}

fn meta_sep(args: &[ScriptResult], ctx: &EvalContext<'_>) -> ScriptResult {
    let values = ctx.metadata().field(text(args, 0)).into_values();
    if values.is_empty() {
        return ScriptResult::missing();
    }
    ScriptResult::field(values.join(text(args, 1)))
}

fn meta_num(args: &[ScriptResult], ctx: &EvalContext<'_>) -> ScriptResult {
    let count = match ctx.metadata().field(text(args, 0)) {
        FieldValue::Missing => 0,
        FieldValue::Single(_) => 1,
        FieldValue::Multi(values) => values.len(),
    };
    ScriptResult::literal(count.to_string())
}

// =============================================================================
// Time
// =============================================================================

/// `$timems(ms)` renders a duration as `m:ss`, or `h:mm:ss` from one hour up.
fn timems(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
    let millis = number(args, 0).max(0);
    let total_seconds = millis.checked_div(1000).unwrap_or(0);
    let hours = total_seconds.checked_div(3600).unwrap_or(0);
    let minutes = total_seconds.checked_div(60).unwrap_or(0).rem_euclid(60);
    let seconds = total_seconds.rem_euclid(60);
    let formatted = if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    };
    ScriptResult::literal(formatted)
}

// =============================================================================
// Helpers
// =============================================================================

fn text(args: &[ScriptResult], index: usize) -> &str {
    args.get(index).map_or("", |arg| arg.value.as_str())
}

fn number(args: &[ScriptResult], index: usize) -> i64 {
    parse_number(text(args, index))
}

/// A non-negative count argument, clamped to [`MAX_GENERATED_LEN`].
fn count(args: &[ScriptResult], index: usize) -> usize {
    usize::try_from(number(args, index))
        .unwrap_or(0)
        .min(MAX_GENERATED_LEN)
}

fn grapheme_len(value: &str) -> usize {
    value.graphemes(true).count()
}

/// Parse the leading signed integer of `value`, ignoring leading whitespace.
/// Text without a leading number parses as 0; overflow saturates.
pub(crate) fn parse_number(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let magnitude = digits
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit))
        });
    if negative { -magnitude } else { magnitude }
}
