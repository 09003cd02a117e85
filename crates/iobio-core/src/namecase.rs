//! Surname casing.
//!
//! Biography intros often print the surname in capitals (`PÉREZ DE CUÉLLAR,
//! Javier, …`). [`name_case`] turns such names into their conventional form
//! (`Pérez de Cuéllar`). Names that already mix upper and lower case are
//! assumed to be deliberate and returned unchanged.

/// Lower-case particles, when followed by another name part.
const PARTICLES: &[&str] = &[
    "van", "von", "der", "den", "de", "da", "di", "du", "la", "le", "del", "della", "dos", "das",
    "ter", "bin", "ibn", "y", "e",
];

const ROMAN_NUMERALS: &[&str] = &["ii", "iii", "iv", "vi", "vii", "viii", "ix"];

/// `Mac…` names that are not `Mac` + capitalised stem.
const MAC_EXCEPTIONS: &[&str] = &[
    "macevicius", "machado", "machar", "machin", "machlin", "macias", "maciulis", "mackie",
    "mackle", "macklin", "macquarie", "macomber", "macin", "mackintosh", "macken", "machen",
    "machiel", "macaluso",
];

/// Normalise the casing of a personal name.
pub fn name_case(name: &str) -> String {
    if is_mixed_case(name) {
        return name.to_string();
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    let last = words.len().saturating_sub(1);
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i < last && PARTICLES.contains(&lower.as_str()) {
                lower
            } else {
                lower
                    .split('-')
                    .map(case_part)
                    .collect::<Vec<_>>()
                    .join("-")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_mixed_case(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && s.chars().any(char::is_lowercase)
}

/// Case one hyphen-free, already lower-cased name part.
fn case_part(part: &str) -> String {
    if ROMAN_NUMERALS.contains(&part) {
        return part.to_uppercase();
    }

    let mut out = capitalize_first(part);

    if let Some((head, tail)) = out.split_once('\'') {
        // O'Brien, D'Arcy; but keep a trailing possessive lower case.
        if tail.chars().count() > 1 {
            out = format!("{}'{}", head, capitalize_first(tail));
        }
    }

    if let Some(stem) = out.strip_prefix("Mc") {
        if !stem.is_empty() {
            out = format!("Mc{}", capitalize_first(stem));
        }
    } else if let Some(stem) = out.strip_prefix("Mac") {
        let last = stem.chars().last();
        let qualifies = stem.chars().count() >= 3
            && last.map(|c| !"aciozj".contains(c)).unwrap_or(false)
            && !MAC_EXCEPTIONS.contains(&part);
        if qualifies {
            out = format!("Mac{}", capitalize_first(stem));
        }
    }

    out
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
