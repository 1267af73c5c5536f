/// Rule-based outfit matching
///
/// Every top is paired with every bottom in input order. Pairs where both
/// garments are dark are rejected, and in cool weather the first outerwear
/// piece is added. The first ten surviving outfits are returned; there is
/// no scoring.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RecommendationError;
use crate::state::data::{CatalogItem, ItemType};
use crate::vision::Rgb;

/// Upper bound on returned outfits
pub const MAX_OUTFITS: usize = 10;

/// At or below this temperature an outerwear piece is added
pub const COOL_TEMP_F: f64 = 60.0;

/// Temperature assumed when the caller gives none
pub const DEFAULT_TEMP_F: f64 = 68.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    #[default]
    Class,
    Work,
    Casual,
    Formal,
}

impl Occasion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Class => "class",
            Occasion::Work => "work",
            Occasion::Casual => "casual",
            Occasion::Formal => "formal",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown occasion '{0}' (expected class, work, casual or formal)")]
pub struct ParseOccasionError(String);

impl FromStr for Occasion {
    type Err = ParseOccasionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "class" => Ok(Occasion::Class),
            "work" => Ok(Occasion::Work),
            "casual" => Ok(Occasion::Casual),
            "formal" => Ok(Occasion::Formal),
            _ => Err(ParseOccasionError(s.to_string())),
        }
    }
}

/// Conditions an outfit is picked for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub temp_f: f64,
    /// Carried for seeding; the matching rules do not read it yet
    pub occasion: Occasion,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            temp_f: DEFAULT_TEMP_F,
            occasion: Occasion::default(),
        }
    }
}

impl Context {
    pub fn new(temp_f: f64, occasion: Occasion) -> Self {
        Self { temp_f, occasion }
    }

    pub fn is_cool(&self) -> bool {
        self.temp_f <= COOL_TEMP_F
    }
}

/// Top, bottom and optionally one outerwear piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    pub items: Vec<CatalogItem>,
}

impl Outfit {
    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Darkness check for one garment. A missing color counts as not dark;
/// a present but unparseable one is an error.
fn is_dark(item: &CatalogItem) -> Result<bool, RecommendationError> {
    match &item.dominant_color {
        None => Ok(false),
        Some(text) => text
            .parse::<Rgb>()
            .map(|color| color.is_dark())
            .map_err(|_| RecommendationError::MalformedColor {
                item_id: item.id,
                value: text.clone(),
            }),
    }
}

/// Propose up to `MAX_OUTFITS` outfits from `items`.
pub fn recommend(
    items: &[CatalogItem],
    context: &Context,
) -> Result<Vec<Outfit>, RecommendationError> {
    let of_type = |wanted: ItemType| {
        items
            .iter()
            .filter(move |item| item.item_type == wanted)
            .collect::<Vec<_>>()
    };
    let tops = of_type(ItemType::Top);
    let bottoms = of_type(ItemType::Bottom);
    let outerwear = of_type(ItemType::Outerwear);

    if tops.is_empty() || bottoms.is_empty() {
        return Ok(Vec::new());
    }

    // Parse every candidate color up front so corrupt data always surfaces
    let dark_tops = tops.iter().map(|t| is_dark(t)).collect::<Result<Vec<_>, _>>()?;
    let dark_bottoms = bottoms.iter().map(|b| is_dark(b)).collect::<Result<Vec<_>, _>>()?;

    let layer = if context.is_cool() { outerwear.first() } else { None };

    let mut outfits = Vec::new();
    'pairs: for (top, &top_dark) in tops.iter().zip(&dark_tops) {
        for (bottom, &bottom_dark) in bottoms.iter().zip(&dark_bottoms) {
            if top_dark && bottom_dark {
                continue;
            }

            let mut outfit = vec![(*top).clone(), (*bottom).clone()];
            if let Some(layer) = layer {
                outfit.push((*layer).clone());
            }
            outfits.push(Outfit { items: outfit });

            if outfits.len() == MAX_OUTFITS {
                break 'pairs;
            }
        }
    }

    Ok(outfits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::NewItem;

    fn item(id: i64, item_type: ItemType, color: &str) -> CatalogItem {
        NewItem::new(format!("{id}.png"), item_type)
            .with_color(color)
            .into_item(id)
    }

    #[test]
    fn test_light_top_dark_bottom_in_mild_weather() {
        let items = [
            item(1, ItemType::Top, "rgb(200,200,200)"),
            item(2, ItemType::Bottom, "rgb(30,30,30)"),
        ];
        let outfits = recommend(&items, &Context::new(65.0, Occasion::Class)).unwrap();
        assert_eq!(outfits.len(), 1);
        assert_eq!(outfits[0].ids(), [1, 2]);
    }

    #[test]
    fn test_two_dark_garments_never_pair() {
        let items = [
            item(1, ItemType::Top, "rgb(10,10,10)"),
            item(2, ItemType::Top, "rgb(240,240,240)"),
            item(3, ItemType::Bottom, "rgb(50,50,50)"),
        ];
        let outfits = recommend(&items, &Context::default()).unwrap();
        let pairs: Vec<_> = outfits.iter().map(Outfit::ids).collect();
        assert_eq!(pairs, [vec![2, 3]]);
    }

    #[test]
    fn test_cool_weather_adds_first_outerwear() {
        let items = [
            item(1, ItemType::Top, "rgb(200,200,200)"),
            item(5, ItemType::Outerwear, "rgb(90,60,30)"),
            item(2, ItemType::Bottom, "rgb(30,30,30)"),
            item(6, ItemType::Outerwear, "rgb(0,0,0)"),
        ];
        let outfits = recommend(&items, &Context::new(50.0, Occasion::Work)).unwrap();
        assert_eq!(outfits.len(), 1);
        assert_eq!(outfits[0].len(), 3);
        assert_eq!(outfits[0].items[2], items[1]);
    }

    #[test]
    fn test_sixty_degrees_counts_as_cool() {
        let items = [
            item(1, ItemType::Top, "rgb(200,200,200)"),
            item(2, ItemType::Bottom, "rgb(200,200,200)"),
            item(3, ItemType::Outerwear, "rgb(200,200,200)"),
        ];
        let outfits = recommend(&items, &Context::new(60.0, Occasion::Casual)).unwrap();
        assert_eq!(outfits[0].ids(), [1, 2, 3]);
    }

    #[test]
    fn test_truncates_to_first_ten_in_loop_order() {
        let mut items = Vec::new();
        for id in 1..=3 {
            items.push(item(id, ItemType::Top, "rgb(200,200,200)"));
        }
        for id in 10..=14 {
            items.push(item(id, ItemType::Bottom, "rgb(100,100,100)"));
        }

        let outfits = recommend(&items, &Context::default()).unwrap();
        assert_eq!(outfits.len(), MAX_OUTFITS);

        let expected: Vec<Vec<i64>> = (1..=3)
            .flat_map(|t| (10..=14).map(move |b| vec![t, b]))
            .take(MAX_OUTFITS)
            .collect();
        let actual: Vec<_> = outfits.iter().map(Outfit::ids).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_missing_tops_or_bottoms_is_empty() {
        let items = [
            item(1, ItemType::Top, "rgb(200,200,200)"),
            item(2, ItemType::Shoes, "rgb(0,0,0)"),
        ];
        assert!(recommend(&items, &Context::default()).unwrap().is_empty());
        assert!(recommend(&[], &Context::default()).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_color_is_an_error() {
        let items = [
            item(1, ItemType::Top, "rgb(200,200,200)"),
            item(2, ItemType::Bottom, "navy"),
        ];
        let err = recommend(&items, &Context::default()).unwrap_err();
        assert_eq!(
            err,
            RecommendationError::MalformedColor {
                item_id: 2,
                value: "navy".into()
            }
        );
    }

    #[test]
    fn test_missing_color_is_not_dark() {
        let items = [
            item(1, ItemType::Top, "rgb(0,0,0)"),
            NewItem::new("b.png", ItemType::Bottom).into_item(2),
        ];
        assert_eq!(recommend(&items, &Context::default()).unwrap().len(), 1);
    }

    #[test]
    fn test_default_context() {
        let ctx = Context::default();
        assert_eq!(ctx, Context::new(68.0, Occasion::Class));
        assert!(!ctx.is_cool());
    }

    #[test]
    fn test_occasion_parse() {
        assert_eq!("Formal".parse(), Ok(Occasion::Formal));
        assert!("gala".parse::<Occasion>().is_err());
    }
}
