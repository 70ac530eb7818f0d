use colored::Colorize;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use governor::{Quota, RateLimiter};
use indicatif::ProgressBar;
use reqwest::Url;

use crate::api::{self, RecommendationRecord};
use crate::catalog::{Recommendation, ShoeType, TypeSource, FALLBACK_SHOE_TYPE};

// Keyword tables for the name heuristic, checked in order so the more
// specific categories win over the catch-all casual markers.
const RUNNING_KEYWORDS: &[&str] = &["run", "racer", "marathon", "pegasus", "jog", "sprint"];
const BOOTS_KEYWORDS: &[&str] = &["boot", "chelsea", "trek", "hike", "winter"];
const SPORT_KEYWORDS: &[&str] = &["sport", "train", "court", "gym", "pro", "flex"];
const CASUAL_KEYWORDS: &[&str] = &["classic", "street", "canvas", "suede", "slip", "daily"];

/// Guesses a category from the model name by substring match. None when
/// no keyword list matches.
pub fn resolve_from_name(model: &str) -> Option<ShoeType> {
    let name = model.to_lowercase();
    let tables = [
        (ShoeType::Running, RUNNING_KEYWORDS),
        (ShoeType::Boots, BOOTS_KEYWORDS),
        (ShoeType::Sport, SPORT_KEYWORDS),
        (ShoeType::Casual, CASUAL_KEYWORDS),
    ];
    for (shoe_type, keywords) in tables {
        if keywords.iter().any(|kw| name.contains(kw)) {
            return Some(shoe_type);
        }
    }
    None
}

/// How each enrichment pass went, per fallback tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub looked_up: usize,
    pub heuristic: usize,
    pub defaulted: usize,
}

/// Resolves every record's category concurrently and joins once all of
/// them settle. A failed lookup degrades to the name heuristic and then
/// to the fallback category right away; nothing is retried and no item
/// is dropped.
pub async fn enrich_recommendations(
    client: &reqwest::Client,
    base: &Url,
    pb: &ProgressBar,
    records: Vec<RecommendationRecord>,
    rate: u32,
) -> (Vec<Recommendation>, ResolutionStats) {
    let quota = Quota::per_second(std::num::NonZeroU32::new(rate.max(1)).unwrap());
    let lim = RateLimiter::direct(quota);

    let mut lookups: Vec<Option<ShoeType>> = vec![None; records.len()];
    {
        let mut tasks = FuturesUnordered::new();
        for (idx, record) in records.iter().enumerate() {
            let lim = &lim;
            let model = record.model.clone();
            tasks.push(async move {
                lim.until_ready().await;
                pb.set_message(format!(
                    "{} {}",
                    "resolving type ::".bold().white(),
                    model.bold().blue(),
                ));
                let resolved = api::fetch_shoe_type(client, base, &model).await;
                pb.inc(1);
                (idx, resolved)
            });
        }
        while let Some((idx, resolved)) = tasks.next().await {
            lookups[idx] = resolved;
        }
    }

    let mut stats = ResolutionStats::default();
    let enriched = records
        .into_iter()
        .zip(lookups)
        .map(|(record, lookup)| {
            let (shoe_type, type_source) = match lookup {
                Some(shoe_type) => {
                    stats.looked_up += 1;
                    (shoe_type, TypeSource::Lookup)
                }
                None => match resolve_from_name(&record.model) {
                    Some(shoe_type) => {
                        stats.heuristic += 1;
                        (shoe_type, TypeSource::Heuristic)
                    }
                    None => {
                        stats.defaulted += 1;
                        (FALLBACK_SHOE_TYPE, TypeSource::Default)
                    }
                },
            };
            Recommendation {
                model: record.model,
                compatibility: record.compatibility,
                best_size_eu: record.best_size.eu,
                shoe_type,
                type_source,
            }
        })
        .collect();

    (enriched, stats)
}
