//! Badge Eligibility Engine
//!
//! Pure rule evaluation over a user's full review history. Rules come in
//! two categories:
//!
//! - **Derived** — a predicate over the review history (volume, ingredients,
//!   time-of-day, cadence). Recomputed from scratch on every run.
//! - **Sticky** — never computed here; carried forward only if the badge is
//!   already on the profile. Granted exactly once by an external signal at
//!   the moment of the triggering event (`founder` at signup seeding,
//!   `first_restaurant` / `first_sandwich` from the review transaction).
//!
//! All rules are independent; the result is the union of every rule that
//! matches, in rule-declaration order, duplicate-free by construction.

use chrono::{Datelike, Timelike, Weekday};
use shared::models::{Review, UserProfile};

/// Cheese names tracked for the variety badge
const CHEESE_TYPES: &[&str] = &[
    "cheddar",
    "swiss",
    "provolone",
    "american",
    "pepper jack",
    "gruyere",
    "blue cheese",
];

/// Any of these substrings disqualifies a review from the veggie badge
const MEAT_TERMS: &[&str] = &["bacon", "sausage", "ham", "chorizo", "steak", "pork", "chicken"];

/// Heat markers for the spicy badge
const SPICY_TERMS: &[&str] = &["spicy", "jalapeño", "hot sauce"];

/// Inclusive streak window: 3 reviews within 7 days
const STREAK_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Precomputed view of a user's review history
struct RuleContext<'a> {
    reviews: &'a [Review],
    existing_badges: &'a [String],
    /// Per-review ingredient lists, lowercased
    per_review: Vec<Vec<String>>,
    /// Flattened lowercase ingredient pool across all reviews
    all_ingredients: Vec<String>,
}

impl<'a> RuleContext<'a> {
    fn new(reviews: &'a [Review], existing_badges: &'a [String]) -> Self {
        let per_review: Vec<Vec<String>> = reviews
            .iter()
            .map(|r| r.ingredients.iter().map(|i| i.to_lowercase()).collect())
            .collect();
        let all_ingredients = per_review.iter().flatten().cloned().collect();
        Self {
            reviews,
            existing_badges,
            per_review,
            all_ingredients,
        }
    }
}

/// One badge rule
enum BadgeRule {
    /// Awarded at a cumulative review-count threshold
    Volume { slug: &'static str, threshold: usize },
    /// Pass-through of already-held badges
    Sticky { slug: &'static str },
    /// Predicate over the review history
    Derived {
        slug: &'static str,
        predicate: fn(&RuleContext<'_>) -> bool,
    },
}

/// Rule table, in award/display order
const RULES: &[BadgeRule] = &[
    BadgeRule::Volume { slug: "first_review", threshold: 1 },
    BadgeRule::Volume { slug: "five_reviews", threshold: 5 },
    BadgeRule::Volume { slug: "ten_reviews", threshold: 10 },
    BadgeRule::Volume { slug: "twenty_reviews", threshold: 20 },
    BadgeRule::Volume { slug: "fifty_reviews", threshold: 50 },
    BadgeRule::Sticky { slug: "founder" },
    BadgeRule::Sticky { slug: "first_restaurant" },
    BadgeRule::Sticky { slug: "first_sandwich" },
    BadgeRule::Derived { slug: "egg_over_easy", predicate: has_over_easy_egg },
    BadgeRule::Derived { slug: "egg_scrambled", predicate: has_scrambled_egg },
    BadgeRule::Derived { slug: "egg_poached", predicate: has_poached_egg },
    BadgeRule::Derived { slug: "cheese_variety", predicate: has_cheese_variety },
    BadgeRule::Derived { slug: "early_bird", predicate: has_early_bird },
    BadgeRule::Derived { slug: "night_owl", predicate: has_night_owl },
    BadgeRule::Derived { slug: "weekend_warrior", predicate: is_weekend_warrior },
    BadgeRule::Derived { slug: "spicy", predicate: has_spicy },
    BadgeRule::Derived { slug: "avocado", predicate: is_avocado_addict },
    BadgeRule::Derived { slug: "bacon", predicate: is_bacon_believer },
    BadgeRule::Derived { slug: "veggie", predicate: has_veggie_heavy },
    BadgeRule::Derived { slug: "streak", predicate: has_streak },
];

/// Compute the complete set of badges a user should currently display.
///
/// Pure: no I/O, no clock reads. The result is insertion-ordered by rule
/// declaration; sticky badges survive even with zero qualifying activity.
pub fn calculate_eligible_badges(
    user_id: &str,
    reviews: &[Review],
    profile: &UserProfile,
) -> Vec<String> {
    let ctx = RuleContext::new(reviews, &profile.badges);
    let mut earned = Vec::new();

    for rule in RULES {
        match rule {
            BadgeRule::Volume { slug, threshold } => {
                if ctx.reviews.len() >= *threshold {
                    earned.push(slug.to_string());
                }
            }
            BadgeRule::Sticky { slug } => {
                if ctx.existing_badges.iter().any(|b| b == slug) {
                    earned.push(slug.to_string());
                }
            }
            BadgeRule::Derived { slug, predicate } => {
                if predicate(&ctx) {
                    earned.push(slug.to_string());
                }
            }
        }
    }

    tracing::debug!(user_id, earned = earned.len(), "badge eligibility computed");
    earned
}

// ── Derived predicates ──────────────────────────────────────────────

fn has_over_easy_egg(ctx: &RuleContext<'_>) -> bool {
    ctx.all_ingredients.iter().any(|i| i == "over-easy egg")
}

fn has_scrambled_egg(ctx: &RuleContext<'_>) -> bool {
    ctx.all_ingredients
        .iter()
        .any(|i| i == "scrambled egg" || i == "scrambled eggs")
}

fn has_poached_egg(ctx: &RuleContext<'_>) -> bool {
    ctx.all_ingredients.iter().any(|i| i == "poached egg")
}

fn has_cheese_variety(ctx: &RuleContext<'_>) -> bool {
    let tried = CHEESE_TYPES
        .iter()
        .filter(|cheese| ctx.all_ingredients.iter().any(|i| i.contains(*cheese)))
        .count();
    tried >= 3
}

fn has_early_bird(ctx: &RuleContext<'_>) -> bool {
    ctx.reviews.iter().any(|r| r.created_at.hour() < 8)
}

fn has_night_owl(ctx: &RuleContext<'_>) -> bool {
    ctx.reviews.iter().any(|r| r.created_at.hour() >= 22)
}

fn is_weekend_warrior(ctx: &RuleContext<'_>) -> bool {
    let weekend = ctx
        .reviews
        .iter()
        .filter(|r| matches!(r.created_at.weekday(), Weekday::Sat | Weekday::Sun))
        .count();
    weekend >= 3
}

fn has_spicy(ctx: &RuleContext<'_>) -> bool {
    ctx.per_review.iter().any(|ingredients| {
        ingredients
            .iter()
            .any(|i| SPICY_TERMS.iter().any(|term| i.contains(term)))
    })
}

fn is_avocado_addict(ctx: &RuleContext<'_>) -> bool {
    reviews_containing(ctx, "avocado") >= 3
}

fn is_bacon_believer(ctx: &RuleContext<'_>) -> bool {
    reviews_containing(ctx, "bacon") >= 5
}

/// Count reviews whose ingredient list has a substring match on `term`
fn reviews_containing(ctx: &RuleContext<'_>, term: &str) -> usize {
    ctx.per_review
        .iter()
        .filter(|ingredients| ingredients.iter().any(|i| i.contains(term)))
        .count()
}

fn has_veggie_heavy(ctx: &RuleContext<'_>) -> bool {
    ctx.per_review.iter().any(|ingredients| {
        ingredients.len() > 3
            && !ingredients
                .iter()
                .any(|i| MEAT_TERMS.iter().any(|meat| i.contains(meat)))
    })
}

/// Any 3 reviews spanning at most 7 days (forward scan over sorted
/// consecutive triples)
fn has_streak(ctx: &RuleContext<'_>) -> bool {
    let mut stamps: Vec<i64> = ctx
        .reviews
        .iter()
        .map(|r| r.created_at.timestamp_millis())
        .collect();
    stamps.sort_unstable();
    stamps
        .windows(3)
        .any(|w| w[2] - w[0] <= STREAK_WINDOW_MS)
}
