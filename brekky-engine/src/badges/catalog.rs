//! Badge Catalog
//!
//! Static definitions for every badge the club can award. Only slugs are
//! stored per-user; display data lives here.

use shared::models::Badge;

/// Every badge, in display order
pub static ALL_BADGES: &[Badge] = &[
    Badge {
        slug: "first_review",
        name: "First Bite",
        description: "Posted your first review!",
        icon_path: "/assets/badges/first_review.png",
    },
    Badge {
        slug: "five_reviews",
        name: "High Five",
        description: "Posted 5 reviews!",
        icon_path: "/assets/badges/five_reviews.png",
    },
    Badge {
        slug: "ten_reviews",
        name: "Decathlete",
        description: "Posted 10 reviews!",
        icon_path: "/assets/badges/ten_reviews.png",
    },
    Badge {
        slug: "twenty_reviews",
        name: "Twenty Piece",
        description: "Posted 20 reviews!",
        icon_path: "/assets/badges/twenty_reviews.png",
    },
    Badge {
        slug: "fifty_reviews",
        name: "Sammy Sage",
        description: "Posted 50 reviews!",
        icon_path: "/assets/badges/fifty_reviews.png",
    },
    Badge {
        slug: "founder",
        name: "Founder",
        description: "A pioneer of the Brekky Sammy club.",
        icon_path: "/assets/badges/founder.png",
    },
    Badge {
        slug: "first_restaurant",
        name: "Pioneer",
        description: "Added the first new restaurant!",
        icon_path: "/assets/badges/first_restaurant.png",
    },
    Badge {
        slug: "first_sandwich",
        name: "Mastermind",
        description: "Added the first new sandwich!",
        icon_path: "/assets/badges/first_sandwich.png",
    },
    Badge {
        slug: "egg_over_easy",
        name: "Over Easy",
        description: "Tried an over-easy egg.",
        icon_path: "/assets/badges/egg_over_easy.png",
    },
    Badge {
        slug: "egg_scrambled",
        name: "Scrambled",
        description: "Tried scrambled eggs.",
        icon_path: "/assets/badges/egg_scrambled.png",
    },
    Badge {
        slug: "egg_poached",
        name: "Poached Pro",
        description: "Tried a poached egg.",
        icon_path: "/assets/badges/egg_poached.png",
    },
    Badge {
        slug: "cheese_variety",
        name: "Cheese Head",
        description: "Tried 3 different cheese types.",
        icon_path: "/assets/badges/cheese_variety.png",
    },
    Badge {
        slug: "early_bird",
        name: "Early Bird",
        description: "Review posted before 8:00 AM.",
        icon_path: "/assets/badges/early_bird.png",
    },
    Badge {
        slug: "night_owl",
        name: "Night Owl",
        description: "Review posted after 10:00 PM.",
        icon_path: "/assets/badges/night_owl.png",
    },
    Badge {
        slug: "weekend_warrior",
        name: "Weekend Warrior",
        description: "3 reviews posted on weekends.",
        icon_path: "/assets/badges/weekend_warrior.png",
    },
    Badge {
        slug: "spicy",
        name: "Spicy Scout",
        description: "Tried a sandwich with some heat.",
        icon_path: "/assets/badges/spicy.png",
    },
    Badge {
        slug: "avocado",
        name: "Avocado Addict",
        description: "3 reviews with avocado.",
        icon_path: "/assets/badges/avocado.png",
    },
    Badge {
        slug: "bacon",
        name: "Bacon Believer",
        description: "5 reviews with bacon.",
        icon_path: "/assets/badges/bacon.png",
    },
    Badge {
        slug: "veggie",
        name: "Greens Grader",
        description: "Tried a veggie-heavy sandwich.",
        icon_path: "/assets/badges/veggie.png",
    },
    Badge {
        slug: "streak",
        name: "Consistent Gourmet",
        description: "3 reviews in one week.",
        icon_path: "/assets/badges/streak.png",
    },
];

/// Look up a badge definition by slug
pub fn badge_by_slug(slug: &str) -> Option<&'static Badge> {
    ALL_BADGES.iter().find(|b| b.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs_unique() {
        let mut slugs: Vec<_> = ALL_BADGES.iter().map(|b| b.slug).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), ALL_BADGES.len());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(badge_by_slug("founder").unwrap().name, "Founder");
        assert!(badge_by_slug("nope").is_none());
    }
}
