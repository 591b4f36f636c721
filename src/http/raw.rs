//! Wire shapes returned by the music API and their normalization into
//! [`crate::model`] types.
//!
//! Field names drift between API revisions (`link` vs `url`, a flat
//! `primaryArtists` string vs nested `artists.primary`, numeric vs string
//! durations), so everything here is lenient and collapses into one fixed
//! shape in the `normalize` functions.

use serde::Deserialize;

use crate::model::{Album, AlbumRef, Image, Playlist, SearchPage, Song, StreamUrl};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        match (self.success, self.status.as_deref()) {
            (Some(success), _) => success,
            (None, Some(status)) => status.eq_ignore_ascii_case("success"),
            (None, None) => self.data.is_some(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NumOrText {
    Num(f64),
    Text(String),
}

impl NumOrText {
    fn as_u32(&self) -> Option<u32> {
        match self {
            NumOrText::Num(n) if *n >= 0.0 => Some(n.round() as u32),
            NumOrText::Num(_) => None,
            NumOrText::Text(s) => s.trim().parse::<f64>().ok().map(|n| n.max(0.0).round() as u32),
        }
    }

    fn into_string(self) -> String {
        match self {
            NumOrText::Num(n) => format!("{n}"),
            NumOrText::Text(s) => s,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLink {
    #[serde(default)]
    pub quality: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl RawLink {
    fn into_parts(self) -> Option<(String, String)> {
        let url = self.url.or(self.link).filter(|u| !u.is_empty())?;
        Some((self.quality, url))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LinkField {
    List(Vec<RawLink>),
    Single(String),
}

impl LinkField {
    fn into_parts(self) -> Vec<(String, String)> {
        match self {
            LinkField::List(links) => links.into_iter().filter_map(RawLink::into_parts).collect(),
            LinkField::Single(url) if url.is_empty() => Vec::new(),
            LinkField::Single(url) => vec![(String::new(), url)],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawArtist {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawArtists {
    #[serde(default)]
    pub primary: Vec<RawArtist>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ArtistField {
    Text(String),
    List(Vec<RawArtist>),
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAlbumRef {
    #[serde(default)]
    pub id: Option<NumOrText>,
    #[serde(default, alias = "title")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AlbumField {
    Ref(RawAlbumRef),
    Name(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSong {
    pub id: Option<NumOrText>,
    #[serde(alias = "title", alias = "song")]
    pub name: Option<String>,
    #[serde(alias = "primary_artists")]
    pub primary_artists: Option<ArtistField>,
    pub artists: Option<RawArtists>,
    pub album: Option<AlbumField>,
    pub duration: Option<NumOrText>,
    pub image: Option<LinkField>,
    #[serde(alias = "download_url", alias = "downloadUrls")]
    pub download_url: Option<LinkField>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAlbum {
    pub id: Option<NumOrText>,
    #[serde(alias = "title")]
    pub name: Option<String>,
    #[serde(alias = "primary_artists")]
    pub primary_artists: Option<ArtistField>,
    pub artists: Option<RawArtists>,
    pub year: Option<NumOrText>,
    pub songs: Vec<RawSong>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPlaylist {
    pub id: Option<NumOrText>,
    #[serde(alias = "title", alias = "listname")]
    pub name: Option<String>,
    pub description: Option<String>,
    pub songs: Vec<RawSong>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawSearch {
    pub total: Option<NumOrText>,
    pub start: Option<NumOrText>,
    pub results: Vec<RawSong>,
}

/// Songs without an id cannot be played or deduplicated and are dropped.
pub fn normalize_song(raw: RawSong) -> Option<Song> {
    let id = raw.id?.into_string();
    if id.is_empty() {
        return None;
    }

    let album = match raw.album {
        Some(AlbumField::Ref(r)) => AlbumRef {
            id: r.id.map(NumOrText::into_string),
            name: r.name.map(|n| decode_entities(&n)),
        },
        Some(AlbumField::Name(name)) => AlbumRef {
            id: None,
            name: Some(decode_entities(&name)),
        },
        None => AlbumRef::default(),
    };

    Some(Song {
        id,
        name: decode_entities(raw.name.as_deref().unwrap_or("Unknown")),
        primary_artists: artists_line(raw.primary_artists, raw.artists),
        album,
        duration: raw.duration.and_then(|d| d.as_u32()).unwrap_or(0),
        image: raw
            .image
            .map(LinkField::into_parts)
            .unwrap_or_default()
            .into_iter()
            .map(|(quality, url)| Image { quality, url })
            .collect(),
        download_url: raw
            .download_url
            .map(LinkField::into_parts)
            .unwrap_or_default()
            .into_iter()
            .map(|(quality, url)| StreamUrl { quality, url })
            .collect(),
    })
}

pub fn normalize_songs(raw: Vec<RawSong>) -> Vec<Song> {
    raw.into_iter().filter_map(normalize_song).collect()
}

pub fn normalize_album(raw: RawAlbum) -> Album {
    Album {
        id: raw.id.map(NumOrText::into_string).unwrap_or_default(),
        name: decode_entities(raw.name.as_deref().unwrap_or_default()),
        primary_artists: artists_line(raw.primary_artists, raw.artists),
        year: raw.year.map(NumOrText::into_string),
        songs: normalize_songs(raw.songs),
    }
}

pub fn normalize_playlist(raw: RawPlaylist) -> Playlist {
    Playlist {
        id: raw.id.map(NumOrText::into_string).unwrap_or_default(),
        name: decode_entities(raw.name.as_deref().unwrap_or_default()),
        description: raw.description.map(|d| decode_entities(&d)),
        songs: normalize_songs(raw.songs),
    }
}

pub fn normalize_search(raw: RawSearch) -> SearchPage {
    let results = normalize_songs(raw.results);
    SearchPage {
        total: raw
            .total
            .and_then(|t| t.as_u32())
            .unwrap_or(results.len() as u32),
        start: raw.start.and_then(|s| s.as_u32()).unwrap_or(0),
        results,
    }
}

fn artists_line(flat: Option<ArtistField>, nested: Option<RawArtists>) -> String {
    let names: Vec<String> = match (flat, nested) {
        (Some(ArtistField::Text(text)), _) if !text.is_empty() => vec![text],
        (Some(ArtistField::List(list)), _) if !list.is_empty() => {
            list.into_iter().map(|a| a.name).collect()
        }
        (_, Some(nested)) => nested.primary.into_iter().map(|a| a.name).collect(),
        _ => Vec::new(),
    };

    decode_entities(
        &names
            .into_iter()
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
