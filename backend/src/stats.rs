//! Directory-wide statistics for the dashboard.

use common::model::place::Place;
use common::model::stats::{Aggregates, Breakdown, ContactInfo, RatingBucket, Statistics};
use std::collections::HashMap;

const TOP_RATED: f64 = 4.5;
const HIGHLY_REVIEWED: i64 = 100;

/// Share of `total` as a percentage with one decimal; 0 when `total` is 0.
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Counts in first-seen order, then sorted by count, largest first.
fn breakdown<'a>(values: impl Iterator<Item = &'a str>, total: usize) -> Vec<Breakdown> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match slots.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(name, count)| Breakdown {
            name: name.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

/// Ratings rounded to the nearest half star, highest bucket first.
fn rating_distribution(places: &[Place]) -> Vec<RatingBucket> {
    let mut halves: HashMap<i64, usize> = HashMap::new();
    for place in places {
        *halves.entry((place.rating * 2.0).round() as i64).or_default() += 1;
    }
    let mut buckets: Vec<RatingBucket> = halves
        .into_iter()
        .map(|(half, count)| RatingBucket {
            rating: half as f64 / 2.0,
            count,
            percentage: percentage(count, places.len()),
        })
        .collect();
    buckets.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    buckets
}

fn aggregates(places: &[Place]) -> Aggregates {
    let total = places.len();
    let ratings: Vec<f64> = places.iter().map(|p| p.rating).filter(|r| *r > 0.0).collect();
    let reviews: Vec<i64> = places.iter().map(|p| p.reviews).filter(|r| *r > 0).collect();

    let average_rating = if ratings.is_empty() {
        0.0
    } else {
        let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
        (mean * 100.0).round() / 100.0
    };
    let average_reviews = if reviews.is_empty() {
        0
    } else {
        (reviews.iter().sum::<i64>() as f64 / reviews.len() as f64).round() as i64
    };

    let top_rated_count = places.iter().filter(|p| p.rating >= TOP_RATED).count();
    let highly_reviewed_count = places.iter().filter(|p| p.reviews >= HIGHLY_REVIEWED).count();

    Aggregates {
        average_rating,
        average_reviews,
        max_rating: ratings.iter().copied().fold(0.0, f64::max),
        min_rating: ratings.iter().copied().reduce(f64::min).unwrap_or(0.0),
        max_reviews: reviews.iter().copied().max().unwrap_or(0),
        min_reviews: reviews.iter().copied().min().unwrap_or(0),
        top_rated_count,
        top_rated_percentage: percentage(top_rated_count, total),
        highly_reviewed_count,
        highly_reviewed_percentage: percentage(highly_reviewed_count, total),
    }
}

pub fn compute(places: &[Place]) -> Statistics {
    let total = places.len();
    let with_phone = places.iter().filter(|p| p.has_phone()).count();
    let with_website = places.iter().filter(|p| p.has_website()).count();
    let with_both = places
        .iter()
        .filter(|p| p.has_phone() && p.has_website())
        .count();

    Statistics {
        total,
        categories: breakdown(places.iter().map(|p| p.category.as_str()), total),
        governorates: breakdown(places.iter().map(|p| p.governorate.as_str()), total),
        rating_distribution: rating_distribution(places),
        contact_info: ContactInfo {
            with_phone,
            with_website,
            with_both,
            percentage_with_phone: percentage(with_phone, total),
            percentage_with_website: percentage(with_website, total),
            percentage_with_both: percentage(with_both, total),
        },
        aggregates: aggregates(places),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory;
    use crate::db::places::{all, insert, sample};
    use chrono::Utc;

    fn stored(rows: &[(&str, &str, f64, i64, Option<&str>, Option<&str>)]) -> Vec<Place> {
        let conn = memory();
        for (category, governorate, rating, reviews, phone, website) in rows {
            let mut place = sample("p");
            place.category = category.to_string();
            place.governorate = governorate.to_string();
            place.rating = *rating;
            place.reviews = *reviews;
            place.phone_number = phone.map(str::to_string);
            place.website = website.map(str::to_string);
            insert(&conn, &place, Utc::now()).unwrap();
        }
        all(&conn).unwrap()
    }

    #[test]
    fn empty_store_reports_zeros() {
        let stats = compute(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.categories.is_empty());
        assert_eq!(stats.contact_info.percentage_with_phone, 0.0);
        assert_eq!(stats.aggregates, Aggregates::default());
    }

    #[test]
    fn breakdowns_and_contact_info() {
        let places = stored(&[
            ("Café", "Tunis", 4.6, 120, Some("+216"), Some("https://a.tn")),
            ("Café", "Sfax", 4.24, 10, Some(" "), None),
            ("Hotel", "Tunis", 0.0, 0, None, Some("https://c.tn")),
        ]);
        let stats = compute(&places);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.categories[0].name, "Café");
        assert_eq!(stats.categories[0].count, 2);
        assert_eq!(stats.categories[0].percentage, 66.7);
        assert_eq!(stats.governorates[0].name, "Tunis");

        assert_eq!(stats.contact_info.with_phone, 1);
        assert_eq!(stats.contact_info.with_website, 2);
        assert_eq!(stats.contact_info.with_both, 1);
        assert_eq!(stats.contact_info.percentage_with_both, 33.3);
    }

    #[test]
    fn ratings_are_bucketed_by_half_star() {
        let places = stored(&[
            ("Café", "Tunis", 4.6, 0, None, None),
            ("Café", "Tunis", 4.4, 0, None, None),
            ("Café", "Tunis", 4.2, 0, None, None),
            ("Café", "Tunis", 0.0, 0, None, None),
        ]);
        let buckets = compute(&places).rating_distribution;
        let pairs: Vec<_> = buckets.iter().map(|b| (b.rating, b.count)).collect();
        assert_eq!(pairs, vec![(4.5, 2), (4.0, 1), (0.0, 1)]);
    }

    #[test]
    fn aggregates_ignore_zero_values() {
        let places = stored(&[
            ("Café", "Tunis", 4.6, 120, None, None),
            ("Café", "Tunis", 3.0, 30, None, None),
            ("Café", "Tunis", 0.0, 0, None, None),
        ]);
        let aggregates = compute(&places).aggregates;
        assert_eq!(aggregates.average_rating, 3.8);
        assert_eq!(aggregates.average_reviews, 75);
        assert_eq!(aggregates.min_rating, 3.0);
        assert_eq!(aggregates.max_rating, 4.6);
        assert_eq!(aggregates.min_reviews, 30);
        assert_eq!(aggregates.max_reviews, 120);
        assert_eq!(aggregates.top_rated_count, 1);
        assert_eq!(aggregates.highly_reviewed_percentage, 33.3);
    }
}
