use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub quality: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamUrl {
    pub quality: String,
    pub url: String,
}

/// A playable song as normalized at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub name: String,
    pub primary_artists: String,
    pub album: AlbumRef,
    /// Seconds.
    pub duration: u32,
    pub image: Vec<Image>,
    pub download_url: Vec<StreamUrl>,
}

impl Song {
    /// Highest bitrate stream. Entries whose quality cannot be parsed rank
    /// below any parsed one; on ties the later entry wins since the API
    /// lists tiers in ascending order.
    pub fn best_stream_url(&self) -> Option<&str> {
        best_by(&self.download_url, |s| parse_kbps(&s.quality), |s| &s.url)
    }

    pub fn best_image(&self) -> Option<&str> {
        best_by(&self.image, |i| parse_pixels(&i.quality), |i| &i.url)
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration as u64 * 1000
    }

    pub fn display_title(&self) -> String {
        if self.primary_artists.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.name, self.primary_artists)
        }
    }
}

fn best_by<'a, T>(
    items: &'a [T],
    rank: impl Fn(&T) -> Option<u64>,
    url: impl Fn(&T) -> &String,
) -> Option<&'a str> {
    items
        .iter()
        .filter(|&item| !url(item).is_empty())
        .enumerate()
        .max_by_key(|&(i, item)| (rank(item), i))
        .map(|(_, item)| url(item).as_str())
}

fn parse_kbps(quality: &str) -> Option<u64> {
    quality
        .trim()
        .trim_end_matches("kbps")
        .trim()
        .parse()
        .ok()
}

fn parse_pixels(quality: &str) -> Option<u64> {
    let (w, h) = quality.split_once('x')?;
    let w: u64 = w.trim().parse().ok()?;
    let h: u64 = h.trim().parse().ok()?;
    w.checked_mul(h)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub primary_artists: String,
    pub year: Option<String>,
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPage {
    pub total: u32,
    pub start: u32,
    pub results: Vec<Song>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn song(id: &str) -> Song {
        Song {
            id: id.to_string(),
            name: format!("Song {id}"),
            primary_artists: "Artist".to_string(),
            album: AlbumRef::default(),
            duration: 180,
            image: vec![],
            download_url: vec![StreamUrl {
                quality: "320kbps".to_string(),
                url: format!("https://cdn.test/{id}_320.mp4"),
            }],
        }
    }
}
