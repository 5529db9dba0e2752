use crate::config::DEFAULT_SIMILARITY_THRESHOLD;
use crate::domain::{
    calculate_similarity, caption_hash, parse_date, CaptionEntry, CaptionImport, CaptionMap,
    UsageStats, UsedCaptionRecord, NO_BUSINESS,
};
use crate::infrastructure::storage::CaptionStore;
use caption_errors::AppError;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const RECENT_DAYS: i64 = 7;
const CSV_HEADER: &str = "Caption Text,Business,Used Date,Usage Count";

/// Remembers which captions were already posted and flags new ones that repeat them.
///
/// Every operation loads the whole history from the store. Mutations hold an
/// in-process lock across their load/save cycle; separate processes sharing one
/// file can still overwrite each other.
pub struct CaptionTracker {
    store: Arc<dyn CaptionStore>,
    similarity_threshold: f64,
    write_lock: Mutex<()>,
}

impl CaptionTracker {
    pub fn new(store: Arc<dyn CaptionStore>) -> Self {
        Self::with_threshold(store, DEFAULT_SIMILARITY_THRESHOLD)
    }

    pub fn with_threshold(store: Arc<dyn CaptionStore>, similarity_threshold: f64) -> Self {
        Self {
            store,
            similarity_threshold,
            write_lock: Mutex::new(()),
        }
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mark_as_used(&self, text: &str, business: &str) -> Result<bool, AppError> {
        self.mark_as_used_at(text, business, Utc::now())
    }

    /// Returns `false` without touching the store when `text` is blank.
    pub fn mark_as_used_at(
        &self,
        text: &str,
        business: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        if text.trim().is_empty() {
            return Ok(false);
        }

        let _guard = self.lock();
        let mut captions = self.store.load()?;
        record_use(&mut captions, text.trim(), business, now);
        self.store.save(&captions)?;

        tracing::info!("Marked caption as used for '{}'", business);
        Ok(true)
    }

    pub fn unmark_as_used(&self, text: &str) -> Result<bool, AppError> {
        if text.trim().is_empty() {
            return Ok(false);
        }

        let _guard = self.lock();
        let mut captions = self.store.load()?;
        if captions.shift_remove(&caption_hash(text)).is_none() {
            return Ok(false);
        }
        self.store.save(&captions)?;

        tracing::info!("Unmarked caption");
        Ok(true)
    }

    pub fn is_duplicate(&self, text: &str) -> Result<(bool, Option<UsedCaptionRecord>), AppError> {
        self.is_duplicate_with_threshold(text, self.similarity_threshold)
    }

    /// An exact (normalized) match always counts. Otherwise records are compared
    /// in the order they were first used and the first one at or above `threshold`
    /// is returned, which is not necessarily the closest.
    pub fn is_duplicate_with_threshold(
        &self,
        text: &str,
        threshold: f64,
    ) -> Result<(bool, Option<UsedCaptionRecord>), AppError> {
        if text.trim().is_empty() {
            return Ok((false, None));
        }

        let captions = self.store.load()?;
        if let Some(exact) = captions.get(&caption_hash(text)) {
            return Ok((true, Some(exact.clone())));
        }

        let matched = captions
            .into_values()
            .find(|record| calculate_similarity(text, &record.text) >= threshold);

        if let Some(record) = &matched {
            tracing::debug!("Caption resembles one used on {}", record.used_date);
        }

        Ok((matched.is_some(), matched))
    }

    /// Filters combine with AND; an empty filter matches everything. Text and
    /// business are case-insensitive substring matches, the date must equal the
    /// calendar day of `used_date`. Most recent first.
    pub fn search(
        &self,
        query: &str,
        business_filter: &str,
        date_filter: &str,
    ) -> Result<Vec<CaptionEntry>, AppError> {
        let query = query.trim().to_lowercase();
        let business_filter = business_filter.trim().to_lowercase();
        let date_filter = date_filter.trim();
        let wanted_date = if date_filter.is_empty() {
            None
        } else {
            match parse_date(date_filter) {
                Some(date) => Some(date),
                None => {
                    tracing::debug!("Ignoring unparseable date filter '{}'", date_filter);
                    return Ok(Vec::new());
                }
            }
        };

        let captions = self.store.load()?;
        let matches = captions.iter().filter(|(_, record)| {
            (query.is_empty() || record.text.to_lowercase().contains(&query))
                && (business_filter.is_empty()
                    || record.business.to_lowercase().contains(&business_filter))
                && wanted_date.map_or(true, |date| parse_date(&record.used_date) == Some(date))
        });

        Ok(most_recent_first(matches))
    }

    pub fn usage_stats(&self) -> Result<UsageStats, AppError> {
        self.usage_stats_at(Utc::now())
    }

    pub fn usage_stats_at(&self, now: DateTime<Utc>) -> Result<UsageStats, AppError> {
        let captions = self.store.load()?;
        if captions.is_empty() {
            return Ok(UsageStats::default());
        }

        let cutoff = now - Duration::days(RECENT_DAYS);
        let recent_used = captions
            .values()
            .filter(|record| record.used_at().is_some_and(|at| at >= cutoff))
            .count();
        let total_usage_count: u64 = captions.values().map(|r| u64::from(r.usage_count)).sum();
        let avg = total_usage_count as f64 / captions.len() as f64;

        let mut per_business: BTreeMap<&str, usize> = BTreeMap::new();
        for record in captions.values() {
            let business = record.business.trim();
            if !business.is_empty() {
                *per_business.entry(business).or_default() += 1;
            }
        }
        // BTreeMap iterates alphabetically; keep the first name among equal counts.
        let most_used_business = per_business
            .iter()
            .fold(None::<(&str, usize)>, |best, (&name, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((name, count)),
            })
            .map_or_else(|| NO_BUSINESS.to_string(), |(name, _)| name.to_string());

        Ok(UsageStats {
            total_used: captions.len(),
            recent_used,
            most_used_business,
            total_usage_count,
            avg_usage_per_caption: (avg * 100.0).round() / 100.0,
        })
    }

    /// Sorted, non-blank business names seen in the history.
    pub fn unique_businesses(&self) -> Result<Vec<String>, AppError> {
        let captions = self.store.load()?;
        let mut businesses: Vec<String> = captions
            .values()
            .map(|record| record.business.trim())
            .filter(|business| !business.is_empty())
            .map(str::to_string)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        businesses.sort();
        Ok(businesses)
    }

    pub fn delete_many<S: AsRef<str>>(&self, hashes: &[S]) -> Result<usize, AppError> {
        if hashes.is_empty() {
            return Ok(0);
        }

        let _guard = self.lock();
        let mut captions = self.store.load()?;
        let deleted = hashes
            .iter()
            .filter(|hash| captions.shift_remove(hash.as_ref()).is_some())
            .count();

        if deleted > 0 {
            self.store.save(&captions)?;
            tracing::info!("Deleted {} captions from history", deleted);
        }
        Ok(deleted)
    }

    pub fn clear_all(&self) -> Result<usize, AppError> {
        let _guard = self.lock();
        let captions = self.store.load()?;
        self.store.save(&CaptionMap::new())?;

        tracing::info!("Cleared {} captions from history", captions.len());
        Ok(captions.len())
    }

    pub fn recent_captions(&self, days: i64, limit: usize) -> Result<Vec<CaptionEntry>, AppError> {
        self.recent_captions_at(days, limit, Utc::now())
    }

    pub fn recent_captions_at(
        &self,
        days: i64,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<CaptionEntry>, AppError> {
        let cutoff = now - Duration::days(days);
        let captions = self.store.load()?;
        let recent = captions
            .iter()
            .filter(|(_, record)| record.used_at().is_some_and(|at| at >= cutoff));

        let mut entries = most_recent_first(recent);
        entries.truncate(limit);
        Ok(entries)
    }

    pub fn bulk_import(&self, items: &[CaptionImport]) -> Result<usize, AppError> {
        self.bulk_import_at(items, Utc::now())
    }

    /// Marks every non-blank caption as used in a single load/save cycle.
    pub fn bulk_import_at(
        &self,
        items: &[CaptionImport],
        now: DateTime<Utc>,
    ) -> Result<usize, AppError> {
        let usable: Vec<&CaptionImport> =
            items.iter().filter(|item| !item.text.trim().is_empty()).collect();
        if usable.is_empty() {
            return Ok(0);
        }

        let _guard = self.lock();
        let mut captions = self.store.load()?;
        for item in &usable {
            record_use(&mut captions, item.text.trim(), &item.business, now);
        }
        self.store.save(&captions)?;

        tracing::info!("Imported {} captions", usable.len());
        Ok(usable.len())
    }

    /// CSV with a header row, most recent first. `None` when nothing was recorded.
    pub fn export_csv(&self) -> Result<Option<String>, AppError> {
        let captions = self.store.load()?;
        if captions.is_empty() {
            return Ok(None);
        }

        let mut csv = String::from(CSV_HEADER);
        csv.push_str("\r\n");
        for entry in most_recent_first(captions.iter()) {
            let row = [
                csv_field(&entry.text),
                csv_field(&entry.business),
                csv_field(&entry.used_date),
                entry.usage_count.to_string(),
            ];
            csv.push_str(&row.join(","));
            csv.push_str("\r\n");
        }
        Ok(Some(csv))
    }
}

/// Repeat uses update the record where it sits, so the map keeps first-use order.
fn record_use(captions: &mut CaptionMap, text: &str, business: &str, now: DateTime<Utc>) {
    let fresh = UsedCaptionRecord::new(text.to_string(), business.to_string(), now);
    captions
        .entry(caption_hash(text))
        .and_modify(|record| {
            record.usage_count += 1;
            record.text = fresh.text.clone();
            record.business = fresh.business.clone();
            record.used_date = fresh.used_date.clone();
        })
        .or_insert(fresh);
}

fn most_recent_first<'a, I>(records: I) -> Vec<CaptionEntry>
where
    I: Iterator<Item = (&'a String, &'a UsedCaptionRecord)>,
{
    let mut entries: Vec<CaptionEntry> = records
        .map(|(hash, record)| CaptionEntry::from_record(hash, record))
        .collect();
    entries.sort_by(|a, b| b.used_date.cmp(&a.used_date).then_with(|| a.hash.cmp(&b.hash)));
    entries
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
