//! Live backfill for the geopolitical event feed. When the store has no
//! rows, a fixed set of semiconductor-sector searches seeds it with real
//! headlines, classified by cheap keyword inference.

use std::collections::HashSet;
use tracing::warn;

use crate::errors::AppError;
use crate::external::{NewsProvider, NewsQuery};
use crate::models::{GeoEvent, GeoEventType, NewGeoEvent, Severity};
use crate::store::EventRepository;

const BACKFILL_QUERIES: [&str; 3] = [
    "NVDA NVIDIA semiconductor",
    "TSMC Taiwan semiconductor",
    "semiconductor chip geopolitics",
];

const COUNTRY_KEYWORDS: [(&str, &str); 8] = [
    ("taiwan", "Taiwan"),
    ("usa", "USA"),
    ("china", "China"),
    ("japan", "Japan"),
    ("south korea", "South Korea"),
    ("europe", "EU"),
    ("netherlands", "Netherlands"),
    ("germany", "Germany"),
];

pub async fn backfill_geo_events(
    news: &dyn NewsProvider,
    repo: &dyn EventRepository,
) -> Result<Vec<GeoEvent>, AppError> {
    let mut seen = HashSet::new();
    let mut collected: Vec<NewGeoEvent> = Vec::new();

    for query in BACKFILL_QUERIES {
        let articles = match news
            .search_news(&NewsQuery {
                text: Some(query.to_string()),
                language: Some("en".to_string()),
                categories: Some("technology,business,politics".to_string()),
                number: Some(3),
                ..NewsQuery::default()
            })
            .await
        {
            Ok(articles) => articles,
            Err(e) => {
                warn!("backfill query '{query}' failed: {e}");
                continue;
            }
        };

        for article in articles {
            let key = format!(
                "{}-{}",
                article.title,
                article.publish_date.as_deref().unwrap_or_default()
            );
            if !seen.insert(key) {
                continue;
            }
            collected.push(NewGeoEvent {
                timestamp: article.publish_date.clone().unwrap_or_else(|| {
                    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
                }),
                kind: infer_type(&article.title),
                severity: infer_severity(&article.title),
                title: article.title.clone(),
                description: article
                    .summary
                    .clone()
                    .or_else(|| {
                        article
                            .text
                            .as_ref()
                            .map(|text| text.chars().take(200).collect())
                    })
                    .unwrap_or_default(),
                country: infer_country(&article.title, article.summary.as_deref()),
                affected_transactions: 0,
                source: article
                    .authors
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "World News API".to_string()),
            });
        }
    }

    collected.truncate(10);

    for event in &collected {
        if let Err(e) = repo.insert_geo_event(event).await {
            warn!("backfill insert failed: {e}");
        }
    }

    let stored = repo.geo_events(50).await.unwrap_or_default();
    if !stored.is_empty() {
        return Ok(stored);
    }

    // Store unavailable: hand back the collected rows with synthetic ids so
    // the feed still renders.
    Ok(collected
        .into_iter()
        .enumerate()
        .map(|(index, event)| event.with_id(index as i64 + 1))
        .collect())
}

fn infer_country(title: &str, summary: Option<&str>) -> String {
    let text = format!("{title} {}", summary.unwrap_or_default()).to_lowercase();
    for (keyword, country) in COUNTRY_KEYWORDS {
        if text.contains(keyword) {
            return country.to_string();
        }
    }
    "Global".to_string()
}

fn infer_type(title: &str) -> GeoEventType {
    let t = title.to_lowercase();
    if t.contains("sanction") {
        GeoEventType::Sanctions
    } else if t.contains("tariff") || t.contains("trade") {
        GeoEventType::Trade
    } else if t.contains("regulation") || t.contains("regulatory") {
        GeoEventType::Regulation
    } else if t.contains("policy") || t.contains("fed") || t.contains("rate") {
        GeoEventType::Policy
    } else if t.contains("election") || t.contains("political") {
        GeoEventType::Political
    } else {
        GeoEventType::Compliance
    }
}

fn infer_severity(title: &str) -> Severity {
    let t = title.to_lowercase();
    if t.contains("crisis") || t.contains("crash") || t.contains("war") {
        Severity::Critical
    } else if t.contains("risk") || t.contains("threat") || t.contains("sanction") {
        Severity::High
    } else if t.contains("update") || t.contains("change") {
        Severity::Medium
    } else {
        Severity::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_inference_matches_keywords() {
        assert_eq!(infer_type("New sanctions on exports"), GeoEventType::Sanctions);
        assert_eq!(infer_type("Chip tariffs announced"), GeoEventType::Trade);
        assert_eq!(infer_type("Fed holds rates"), GeoEventType::Policy);
        assert_eq!(infer_type("Quarterly earnings beat"), GeoEventType::Compliance);
    }

    #[test]
    fn severity_inference_matches_keywords() {
        assert_eq!(infer_severity("Supply chain crisis deepens"), Severity::Critical);
        assert_eq!(infer_severity("Sanction risk grows"), Severity::High);
        assert_eq!(infer_severity("Policy update expected"), Severity::Medium);
        assert_eq!(infer_severity("Chipmaker opens new fab"), Severity::Low);
    }

    #[test]
    fn country_inference_scans_title_and_summary() {
        assert_eq!(infer_country("TSMC expands in Taiwan", None), "Taiwan");
        assert_eq!(
            infer_country("Fab expansion", Some("New plant in Germany")),
            "Germany"
        );
        assert_eq!(infer_country("Chip news", None), "Global");
    }
}
