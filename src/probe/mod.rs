use std::collections::HashMap;

use colored::Colorize;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use governor::{Quota, RateLimiter};
use indicatif::ProgressBar;
use reqwest::Url;

use crate::api;

/// Checks which models have a catalog photo by attempting the image GET
/// and observing the outcome, the same way the gallery page tried to
/// load it. Only the first photo slot is probed; request errors count
/// as missing.
pub async fn probe_images(
    client: &reqwest::Client,
    base: &Url,
    pb: &ProgressBar,
    models: &[String],
    rate: u32,
) -> HashMap<String, bool> {
    let quota = Quota::per_second(std::num::NonZeroU32::new(rate.max(1)).unwrap());
    let lim = RateLimiter::direct(quota);

    let mut tasks = FuturesUnordered::new();
    for model in models {
        let lim = &lim;
        let url = api::image_url(base, model, 1);
        tasks.push(async move {
            lim.until_ready().await;
            pb.set_message(format!(
                "{} {}",
                "probing photo ::".bold().white(),
                model.bold().blue(),
            ));
            let exists = match client.get(url).send().await {
                Ok(resp) => resp.status().is_success(),
                Err(_) => false,
            };
            pb.inc(1);
            (model.clone(), exists)
        });
    }

    let mut out = HashMap::with_capacity(models.len());
    while let Some((model, exists)) = tasks.next().await {
        out.insert(model, exists);
    }
    out
}
