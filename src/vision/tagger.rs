/// Coarse garment typing from text
///
/// There is no learned classifier here. Types come from ordered keyword
/// tables matched as substrings, and the first table with a hit wins.
/// Table order is observable behavior: "hoodie" sits in both the top and
/// outerwear lists and resolves to top because tops are scanned first.

use crate::state::data::ItemType;

/// Keywords matched against file names, scanned in this order
const NAME_KEYWORDS: &[(ItemType, &[&str])] = &[
    (
        ItemType::Top,
        &["hoodie", "sweater", "tee", "shirt", "top", "blouse"],
    ),
    (
        ItemType::Bottom,
        &["jean", "pant", "trouser", "skirt", "short"],
    ),
    (
        ItemType::Outerwear,
        &["jacket", "coat", "parka", "hoodie"],
    ),
    (ItemType::Shoes, &["sneaker", "shoe", "boot", "loafer"]),
];

/// Image-classifier labels mapped to coarse types, scanned in this order
pub const LABEL_MAP: &[(ItemType, &[&str])] = &[
    (
        ItemType::Top,
        &[
            "shirt", "t-shirt", "tee", "sweatshirt", "sweater", "cardigan", "hoodie", "jersey",
            "blouse", "pullover", "pajama", "flannel",
        ],
    ),
    (
        ItemType::Bottom,
        &[
            "jean", "jeans", "trousers", "pants", "slacks", "chinos", "shorts", "skirt",
            "miniskirt", "sarong", "overskirt",
        ],
    ),
    (
        ItemType::Shoes,
        &[
            "sneaker", "running shoe", "boot", "loafer", "sandal", "clog", "slipper", "shoe",
        ],
    ),
    (
        ItemType::Outerwear,
        &[
            "coat", "trench coat", "fur coat", "jacket", "parka", "windbreaker", "raincoat",
            "overcoat", "cloak", "stole",
        ],
    ),
];

fn scan(table: &[(ItemType, &[&str])], text: &str) -> ItemType {
    let text = text.to_lowercase();
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(item_type, _)| *item_type)
        .unwrap_or(ItemType::Unknown)
}

/// Guess a garment type from a file name or free-text label.
/// Total over all strings: no match yields `Unknown`.
pub fn classify_type_from_name(text: &str) -> ItemType {
    scan(NAME_KEYWORDS, text)
}

/// Map a list of classifier labels to a coarse type
pub fn to_coarse_type<S: AsRef<str>>(labels: &[S]) -> ItemType {
    let joined = labels
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    scan(LABEL_MAP, &joined)
}

/// Parse a label cell such as `['running shoe', 'clog']`.
///
/// Brackets and quotes are optional, so a bare `shirt, tee` also works.
pub fn parse_labels(cell: &str) -> Vec<String> {
    let trimmed = cell.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
