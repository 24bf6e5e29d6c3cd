use serde_json::{Map, Value};

use crate::foundation::core::{Point, Rect, Vec2};
use crate::foundation::error::{LskiaError, LskiaResult};

/// Where a value sits in the stream, for error messages.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Site<'a> {
    pub(crate) index: usize,
    pub(crate) field: &'a str,
}

impl<'a> Site<'a> {
    pub(crate) fn new(index: usize, field: &'a str) -> Self {
        Self { index, field }
    }

    pub(crate) fn invalid(&self, what: &str) -> LskiaError {
        LskiaError::validation(format!(
            "command {}: field '{}' {what}",
            self.index, self.field
        ))
    }
}

pub(crate) fn object<'v>(v: &'v Value, site: Site<'_>) -> LskiaResult<&'v Map<String, Value>> {
    v.as_object()
        .ok_or_else(|| site.invalid("must be an object"))
}

pub(crate) fn array<'v>(v: &'v Value, site: Site<'_>) -> LskiaResult<&'v [Value]> {
    v.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| site.invalid("must be an array"))
}

pub(crate) fn require<'v>(
    obj: &'v Map<String, Value>,
    key: &str,
    index: usize,
) -> LskiaResult<&'v Value> {
    obj.get(key)
        .ok_or_else(|| LskiaError::validation(format!("command {index}: missing field '{key}'")))
}

pub(crate) fn number(v: &Value, site: Site<'_>) -> LskiaResult<f64> {
    v.as_f64().ok_or_else(|| site.invalid("must be a number"))
}

pub(crate) fn numbers<const N: usize>(v: &Value, site: Site<'_>) -> LskiaResult<[f64; N]> {
    let arr = array(v, site)?;
    if arr.len() != N {
        return Err(site.invalid(&format!("must hold {N} numbers, found {}", arr.len())));
    }
    let mut out = [0.0f64; N];
    for (slot, item) in out.iter_mut().zip(arr) {
        *slot = number(item, site)?;
    }
    Ok(out)
}

pub(crate) fn point(v: &Value, site: Site<'_>) -> LskiaResult<Point> {
    let [x, y] = numbers::<2>(v, site)?;
    Ok(Point::new(x, y))
}

pub(crate) fn vec2(v: &Value, site: Site<'_>) -> LskiaResult<Vec2> {
    let [x, y] = numbers::<2>(v, site)?;
    Ok(Vec2::new(x, y))
}

/// `[l, t, r, b]` as a rectangle. Coordinates are kept as recorded, unsorted.
pub(crate) fn ltrb(v: &Value, site: Site<'_>) -> LskiaResult<Rect> {
    let [l, t, r, b] = numbers::<4>(v, site)?;
    Ok(Rect::new(l, t, r, b))
}

/// Fail with `UnsupportedAttribute` on the first key outside `allowed`.
pub(crate) fn reject_unknown_keys(
    obj: &Map<String, Value>,
    allowed: &[&str],
    index: usize,
    scope: &str,
) -> LskiaResult<()> {
    match obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => {
            let attribute = if scope.is_empty() {
                key.clone()
            } else {
                format!("{scope}.{key}")
            };
            Err(LskiaError::unsupported_attribute(
                index,
                attribute,
                format!("not accepted here (allowed: {})", allowed.join(", ")),
            ))
        }
        None => Ok(()),
    }
}
