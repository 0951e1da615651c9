//! Minimal SVG reader for contour slices
//!
//! Only straight-edged closed shapes are understood: `polygon`, closed
//! `polyline`, `rect`, `circle`/`ellipse` (polygonized) and `path` data made of
//! `M L H V Z` commands in absolute or relative form. `transform` attributes
//! are not applied. SVG's y axis points down, so y is negated on output.

use crate::domain::Point2;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::f64::consts::TAU;
use std::iter::Peekable;
use std::vec::IntoIter;
use tracing::warn;

/// Segments used to approximate circles and ellipses
const ARC_SEGMENTS: usize = 64;

/// Parse every closed ring of an SVG document
pub fn parse_svg(text: &str) -> Result<Vec<Vec<Point2>>, String> {
    let mut rings = Vec::new();

    for element in elements(text)? {
        match element.name.as_str() {
            "polygon" => {
                let points = element.attr("points").unwrap_or_default();
                rings.push(parse_points(points)?);
            }
            "polyline" => {
                let ring = parse_points(element.attr("points").unwrap_or_default())?;
                if ring.len() > 2 && ring.first() == ring.last() {
                    rings.push(ring);
                } else {
                    warn!("skipping open polyline");
                }
            }
            "rect" => {
                let x = element.length("x")?.unwrap_or(0.0);
                let y = element.length("y")?.unwrap_or(0.0);
                let w = element.length("width")?.unwrap_or(0.0);
                let h = element.length("height")?.unwrap_or(0.0);
                rings.push(vec![
                    Point2::new(x, y),
                    Point2::new(x + w, y),
                    Point2::new(x + w, y + h),
                    Point2::new(x, y + h),
                ]);
            }
            "circle" => {
                let r = element.length("r")?.unwrap_or(0.0);
                rings.push(ellipse(&element, r, r)?);
            }
            "ellipse" => {
                let rx = element.length("rx")?.unwrap_or(0.0);
                let ry = element.length("ry")?.unwrap_or(0.0);
                rings.push(ellipse(&element, rx, ry)?);
            }
            "path" => {
                rings.extend(parse_path(element.attr("d").unwrap_or_default())?);
            }
            _ => {}
        }
    }

    Ok(rings
        .into_iter()
        .map(|ring| ring.into_iter().map(|p| Point2::new(p.x, -p.y)).collect())
        .collect())
}

fn ellipse(element: &Element, rx: f64, ry: f64) -> Result<Vec<Point2>, String> {
    let cx = element.length("cx")?.unwrap_or(0.0);
    let cy = element.length("cy")?.unwrap_or(0.0);
    Ok((0..ARC_SEGMENTS)
        .map(|i| {
            let angle = TAU * i as f64 / ARC_SEGMENTS as f64;
            Point2::new(cx + rx * angle.cos(), cy + ry * angle.sin())
        })
        .collect())
}

/// Start tag of an element with its attributes
#[derive(Debug)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, String> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| format!("malformed attribute in <{name}>: {e}"))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| format!("invalid {key} attribute in <{name}>: {e}"))?;
            attrs.push((key, value.into_owned()));
        }
        Ok(Self { name, attrs })
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Numeric attribute, accepting a trailing `px` unit
    fn length(&self, key: &str) -> Result<Option<f64>, String> {
        let Some(raw) = self.attr(key) else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
        number
            .parse()
            .map(Some)
            .map_err(|_| format!("invalid {key} attribute {raw:?}"))
    }
}

/// Containers whose children are only referenced, never drawn
const HIDDEN_CONTAINERS: [&str; 6] = ["defs", "clipPath", "mask", "marker", "pattern", "symbol"];

/// Drawn elements of the document in order, skipping hidden containers
fn elements(text: &str) -> Result<Vec<Element>, String> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut out = Vec::new();
    let mut hidden_depth = 0usize;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let element = Element::from_start(e)?;
                if hidden_depth > 0 || HIDDEN_CONTAINERS.contains(&element.name.as_str()) {
                    hidden_depth += 1;
                } else {
                    out.push(element);
                }
            }
            Ok(Event::Empty(ref e)) => {
                if hidden_depth == 0 {
                    out.push(Element::from_start(e)?);
                }
            }
            Ok(Event::End(_)) => {
                hidden_depth = hidden_depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML parse error: {e}")),
            Ok(_) => {}
        }
        buf.clear();
    }

    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

fn tokenize(data: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = data.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() || c == ',' {
            i += 1;
            continue;
        }
        if c.is_ascii_alphabetic() && c != 'e' && c != 'E' {
            tokens.push(Token::Command(c));
            i += 1;
            continue;
        }

        let start = i;
        if c == '+' || c == '-' {
            i += 1;
        }
        let (mut seen_dot, mut seen_exp) = (false, false);
        while let Some(&c) = chars.get(i) {
            if c.is_ascii_digit() {
                i += 1;
            } else if c == '.' && !seen_dot && !seen_exp {
                seen_dot = true;
                i += 1;
            } else if (c == 'e' || c == 'E') && !seen_exp && i > start {
                seen_exp = true;
                i += 1;
                if matches!(chars.get(i), Some('+' | '-')) {
                    i += 1;
                }
            } else {
                break;
            }
        }
        if i == start {
            return Err(format!("unexpected character {c:?}"));
        }

        let text: String = chars[start..i].iter().collect();
        let value = text
            .parse()
            .map_err(|_| format!("invalid number {text:?}"))?;
        tokens.push(Token::Number(value));
    }

    Ok(tokens)
}

fn parse_points(points: &str) -> Result<Vec<Point2>, String> {
    let mut numbers = Vec::new();
    for token in tokenize(points)? {
        match token {
            Token::Number(v) => numbers.push(v),
            Token::Command(c) => return Err(format!("unexpected {c:?} in points")),
        }
    }
    if numbers.len() % 2 != 0 {
        return Err("odd number of coordinates in points".to_string());
    }
    Ok(numbers
        .chunks_exact(2)
        .map(|xy| Point2::new(xy[0], xy[1]))
        .collect())
}

fn next_number(tokens: &mut Peekable<IntoIter<Token>>) -> Option<f64> {
    match tokens.peek() {
        Some(&Token::Number(v)) => {
            tokens.next();
            Some(v)
        }
        _ => None,
    }
}

fn next_pair(tokens: &mut Peekable<IntoIter<Token>>) -> Result<Option<(f64, f64)>, String> {
    let Some(x) = next_number(tokens) else {
        return Ok(None);
    };
    let y = next_number(tokens).ok_or("missing y coordinate in path data")?;
    Ok(Some((x, y)))
}

/// Ends the current subpath; open subpaths are only kept if they return to their start
fn finish_subpath(current: &mut Vec<Point2>, rings: &mut Vec<Vec<Point2>>, closed: bool) {
    let subpath = std::mem::take(current);
    if subpath.len() < 3 {
        return;
    }
    if closed || subpath.first() == subpath.last() {
        rings.push(subpath);
    } else {
        warn!("skipping open path");
    }
}

fn parse_path(d: &str) -> Result<Vec<Vec<Point2>>, String> {
    let mut tokens = tokenize(d)?.into_iter().peekable();
    let mut rings = Vec::new();
    let mut current: Vec<Point2> = Vec::new();
    let mut pos = Point2::ORIGIN;
    let mut start = Point2::ORIGIN;

    while let Some(token) = tokens.next() {
        let Token::Command(cmd) = token else {
            return Err("path data must start with a command".to_string());
        };
        let relative = cmd.is_ascii_lowercase();

        match cmd.to_ascii_uppercase() {
            'Z' => {
                finish_subpath(&mut current, &mut rings, true);
                pos = start;
            }
            'M' | 'L' => {
                let mut first = true;
                while let Some((x, y)) = next_pair(&mut tokens)? {
                    let target = if relative {
                        Point2::new(pos.x + x, pos.y + y)
                    } else {
                        Point2::new(x, y)
                    };
                    if first && cmd.eq_ignore_ascii_case(&'M') {
                        finish_subpath(&mut current, &mut rings, false);
                        start = target;
                    } else if current.is_empty() {
                        current.push(pos);
                    }
                    current.push(target);
                    pos = target;
                    first = false;
                }
                if first {
                    return Err(format!("missing coordinates for '{cmd}'"));
                }
            }
            axis @ ('H' | 'V') => {
                let mut first = true;
                while let Some(v) = next_number(&mut tokens) {
                    let target = match (axis, relative) {
                        ('H', true) => Point2::new(pos.x + v, pos.y),
                        ('H', false) => Point2::new(v, pos.y),
                        (_, true) => Point2::new(pos.x, pos.y + v),
                        (_, false) => Point2::new(pos.x, v),
                    };
                    if current.is_empty() {
                        current.push(pos);
                    }
                    current.push(target);
                    pos = target;
                    first = false;
                }
                if first {
                    return Err(format!("missing coordinate for '{cmd}'"));
                }
            }
            _ => return Err(format!("unsupported path command '{cmd}'")),
        }
    }

    finish_subpath(&mut current, &mut rings, false);
    Ok(rings)
}
