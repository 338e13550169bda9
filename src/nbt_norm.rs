use serde_json::{Number, Value};

const INT_SUFFIXES: [char; 6] = ['b', 'B', 's', 'S', 'l', 'L'];
const FLOAT_SUFFIXES: [char; 4] = ['f', 'F', 'd', 'D'];

/// Turn a bare (unquoted) SNBT token into a value.
///
/// Keywords become booleans/null, NBT-typed numeric literals such as `4L`,
/// `1b` or `0.5d` lose their type suffix, and anything else is kept as an
/// unquoted string.
pub fn classify_bare(token: &str) -> Value {
    match token {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => normalize_number(token).unwrap_or_else(|| Value::String(token.to_string())),
    }
}

/// Strip an NBT type suffix from a numeric literal and return its value.
///
/// Returns `None` when the token is not a number at all.
pub fn normalize_number(token: &str) -> Option<Value> {
    if !looks_numeric(token) {
        return None;
    }
    let last = token.chars().last()?;
    if FLOAT_SUFFIXES.contains(&last) {
        return float_value(&token[..token.len() - 1]);
    }

    let has_int_suffix = INT_SUFFIXES.contains(&last);
    let body = if has_int_suffix {
        &token[..token.len() - 1]
    } else {
        token
    };
    if let Ok(n) = body.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }
    if let Ok(n) = body.parse::<u64>() {
        return Some(Value::Number(n.into()));
    }
    if has_int_suffix {
        // `1.5b` is not a valid byte
        return None;
    }
    float_value(body)
}

fn float_value(body: &str) -> Option<Value> {
    if !looks_numeric(body) {
        return None;
    }
    body.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

// f64's FromStr also accepts "inf" and "NaN", which SNBT treats as strings.
fn looks_numeric(token: &str) -> bool {
    let unsigned = token
        .strip_prefix('-')
        .or_else(|| token.strip_prefix('+'))
        .unwrap_or(token);
    let mut chars = unsigned.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}
