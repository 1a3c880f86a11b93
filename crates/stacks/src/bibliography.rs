//! Bibliographic record parsing and writing.
//!
//! This module turns raw BibTeX-style text into field mappings and back. It
//! intentionally covers only what the archive needs: braced entries with a
//! cite key and `name = value` fields. Author lists are normalized from the
//! source's `" and "`-joined form to a `"; "`-joined list at parse time, and
//! the writer emits the conjunction form again so records round-trip.
//!
//! The record's identifier is kept out of the field mapping (it is a derived
//! composite of other fields, not primary content), which is what keeps it
//! from being scanned during free-text search.

use super::*;

/// One parsed bibliographic record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  /// The cite key, used as the archive key.
  pub key:    String,
  /// Entry type (`article`, `inproceedings`, ...), lowercased.
  pub kind:   String,
  /// Field mapping, with lowercased names and brace/quote-stripped values.
  pub fields: BTreeMap<String, String>,
}

impl Entry {
  /// The publication venue: the `venue` field if present, otherwise
  /// `journal`, otherwise `booktitle`.
  pub fn venue(&self) -> Option<&str> {
    ["venue", "journal", "booktitle"].iter().find_map(|f| self.fields.get(*f)).map(String::as_str)
  }

  /// Author names, split out of the normalized semicolon-joined list.
  pub fn authors(&self) -> Vec<String> {
    self
      .fields
      .get("author")
      .map(|a| a.split(';').map(|name| name.trim().to_string()).collect())
      .unwrap_or_default()
  }

  /// Writes the record back out as BibTeX.
  ///
  /// Field values are brace-delimited and the author list is re-joined with
  /// `" and "`. Used by rekeying to rewrite the identifier in place.
  pub fn to_bibtex(&self) -> String {
    let mut out = format!("@{}{{{},\n", self.kind, self.key);
    for (name, value) in &self.fields {
      let value =
        if name == "author" { value.replace("; ", " and ") } else { value.clone() };
      out.push_str(&format!("  {name} = {{{value}}},\n"));
    }
    out.push_str("}\n");
    out
  }
}

/// Parses every record in `raw`.
///
/// `@comment`, `@preamble`, and `@string` blocks are skipped. Returns
/// [`StacksError::Bibliography`] on malformed input (unterminated entries,
/// unbalanced braces, missing keys).
pub fn parse(raw: &str) -> Result<Vec<Entry>> {
  let mut entries = Vec::new();
  let mut rest = raw;

  while let Some(at) = rest.find('@') {
    rest = &rest[at + 1..];
    let open = rest
      .find('{')
      .ok_or_else(|| StacksError::Bibliography("entry has no opening brace".into()))?;
    let kind = rest[..open].trim().to_lowercase();
    rest = &rest[open + 1..];

    let (body, tail) = split_balanced(rest)?;
    rest = tail;

    if matches!(kind.as_str(), "comment" | "preamble" | "string") {
      continue;
    }

    let comma =
      body.find(',').ok_or_else(|| StacksError::Bibliography("entry has no fields".into()))?;
    let key = body[..comma].trim().to_string();
    if key.is_empty() {
      return Err(StacksError::Bibliography("entry has an empty key".into()));
    }

    entries.push(Entry { key, kind, fields: parse_fields(&body[comma + 1..])? });
  }

  Ok(entries)
}

/// Parses `raw` and requires exactly one record.
///
/// Returns [`StacksError::AmbiguousKey`] listing every key found when the
/// source holds more than one record, and [`StacksError::Bibliography`] when
/// it holds none.
pub fn single_entry(raw: &str) -> Result<Entry> {
  let mut entries = parse(raw)?;
  match entries.len() {
    0 => Err(StacksError::Bibliography("source contains no records".into())),
    1 => Ok(entries.remove(0)),
    _ => Err(StacksError::AmbiguousKey(entries.into_iter().map(|e| e.key).collect())),
  }
}

/// Splits `rest` at the brace matching an already-consumed `{`.
///
/// Returns the text before the match and the text after it.
fn split_balanced(rest: &str) -> Result<(&str, &str)> {
  let mut depth = 1usize;
  for (i, c) in rest.char_indices() {
    match c {
      '{' => depth += 1,
      '}' => {
        depth -= 1;
        if depth == 0 {
          return Ok((&rest[..i], &rest[i + 1..]));
        }
      },
      _ => {},
    }
  }
  Err(StacksError::Bibliography("unbalanced braces in entry".into()))
}

/// Parses the `name = value` field list of one entry body.
fn parse_fields(body: &str) -> Result<BTreeMap<String, String>> {
  let mut fields = BTreeMap::new();
  let mut rest = body;

  loop {
    rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    if rest.is_empty() {
      break;
    }

    let eq = rest
      .find('=')
      .ok_or_else(|| StacksError::Bibliography(format!("field without value: `{}`", rest.trim())))?;
    let name = rest[..eq].trim().to_lowercase();
    rest = rest[eq + 1..].trim_start();

    let (value, tail) = if let Some(stripped) = rest.strip_prefix('{') {
      split_balanced(stripped)?
    } else if let Some(stripped) = rest.strip_prefix('"') {
      let close = stripped
        .find('"')
        .ok_or_else(|| StacksError::Bibliography(format!("unterminated value for `{name}`")))?;
      (&stripped[..close], &stripped[close + 1..])
    } else {
      match rest.find(',') {
        Some(comma) => (&rest[..comma], &rest[comma + 1..]),
        None => (rest, ""),
      }
    };
    rest = tail;

    let value = clean_value(value);
    let value = if name == "author" { normalize_authors(&value) } else { value };
    fields.insert(name, value);
  }

  Ok(fields)
}

/// Collapses runs of whitespace (including newlines in wrapped values) and
/// strips interior grouping braces.
fn clean_value(value: &str) -> String {
  let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
  collapsed.replace(['{', '}'], "")
}

/// Rewrites an `" and "`-joined author list as a `"; "`-joined one.
fn normalize_authors(value: &str) -> String {
  value.split(" and ").map(str::trim).collect::<Vec<_>>().join("; ")
}
