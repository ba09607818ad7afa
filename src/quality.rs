use std::collections::BTreeMap;

use crate::models::Torrent;

const DEFAULT_RANKS: [(&str, u32); 3] = [("720p", 1), ("1080p", 2), ("2160p", 3)];

/// Desirability of each quality label, higher is better. Labels that are not
/// in the table rank 0 and are never selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityRanks {
    ranks: BTreeMap<String, u32>,
}

impl Default for QualityRanks {
    fn default() -> Self {
        Self::new(
            DEFAULT_RANKS
                .iter()
                .map(|(label, rank)| (label.to_string(), *rank)),
        )
    }
}

impl QualityRanks {
    pub fn new(ranks: impl IntoIterator<Item = (String, u32)>) -> Self {
        Self {
            ranks: ranks.into_iter().collect(),
        }
    }

    pub fn rank(&self, quality: &str) -> u32 {
        self.ranks.get(quality).copied().unwrap_or(0)
    }

    /// Picks the torrent with the strictly highest rank; the first one wins
    /// on ties.
    pub fn select_best<'a>(&self, torrents: &'a [Torrent]) -> Option<&'a Torrent> {
        let mut high = 0;
        let mut best = None;
        for torrent in torrents {
            let rank = self.rank(&torrent.quality);
            if rank > high {
                high = rank;
                best = Some(torrent);
            }
        }
        best
    }
}
