//! Maps decoded make/model names onto Car-Part.com's model vocabulary.

/// Manufacturer names the marketplace spells differently (matched case-insensitively).
const MAKE_ALIASES: &[(&str, &str)] = &[
    ("mercedes-benz", "Mercedes"),
    ("mercedes benz", "Mercedes"),
    ("mercedes", "Mercedes"),
    ("chevrolet", "Chevy"),
    ("volkswagen", "VW"),
    ("alfa romeo", "Alfa"),
    ("rolls-royce", "Rolls Royce"),
];

/// Mercedes model codes that are listed under their own name instead of "<code> Class".
const CLASS_OVERRIDES: &[&str] = &["SPRINTER", "METRIS", "MAYBACH", "AMG"];

/// Makes whose models are grouped as "<code> Class" on the marketplace.
const CLASS_MAKES: &[&str] = &["Mercedes"];

/// Returns the marketplace spelling of a manufacturer name.
pub fn normalize_make(make: &str) -> String {
    let make = make.trim();
    MAKE_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(make))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| make.to_string())
}

/// Returns the marketplace model name for an already-normalized make.
pub fn normalize_model(make: &str, model: &str) -> String {
    let model = model.trim();
    let class_make = CLASS_MAKES.iter().any(|m| m.eq_ignore_ascii_case(make.trim()));
    if !class_make || model.to_lowercase().contains("class") {
        return model.to_string();
    }

    let code: String = model.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    if code.is_empty() {
        return model.to_string();
    }

    let code = code.to_uppercase();
    if CLASS_OVERRIDES.contains(&code.as_str()) {
        model.to_string()
    } else {
        format!("{} Class", code)
    }
}

/// Builds the `"<make> <model>"` string submitted as the search model.
pub fn model_search_term(make: &str, model: &str) -> String {
    let make = normalize_make(make);
    let model = normalize_model(&make, model);
    format!("{} {}", make, model).trim().to_string()
}
