use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};

use super::error::MongoDaoError;
use crate::dao::models::{
    FeedbackEntity, NewFeedback, NewPalette, PaletteEntity, PaletteSource, into_slots,
};
use crate::engine::color::HexColor;

/// Palette as stored in the `palettes` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPaletteDocument {
    #[serde(rename = "_id")]
    id: i64,
    colors: Vec<Option<HexColor>>,
    source: PaletteSource,
    #[serde(default)]
    image_path: Option<String>,
    #[serde(default)]
    likes: i64,
    #[serde(default)]
    dislikes: i64,
    created_at: DateTime,
}

impl MongoPaletteDocument {
    /// Fresh document with zeroed counters.
    pub fn new(id: i64, palette: NewPalette) -> Self {
        Self {
            id,
            colors: palette.slots().into_iter().collect(),
            source: palette.source,
            image_path: palette.image_path,
            likes: 0,
            dislikes: 0,
            created_at: DateTime::now(),
        }
    }
}

impl TryFrom<MongoPaletteDocument> for PaletteEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoPaletteDocument) -> Result<Self, Self::Error> {
        let corrupted = |reason: &str| MongoDaoError::Corrupted {
            record: "palette",
            id: value.id,
            reason: reason.to_owned(),
        };
        let id = u64::try_from(value.id).map_err(|_| corrupted("negative id"))?;
        let likes = u32::try_from(value.likes).map_err(|_| corrupted("likes out of range"))?;
        let dislikes =
            u32::try_from(value.dislikes).map_err(|_| corrupted("dislikes out of range"))?;

        Ok(Self {
            id,
            colors: into_slots(value.colors.into_iter().flatten()),
            source: value.source,
            image_path: value.image_path,
            likes,
            dislikes,
            created_at: value.created_at.to_system_time(),
        })
    }
}

/// Vote as stored in the `feedback` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoFeedbackDocument {
    #[serde(rename = "_id")]
    id: i64,
    palette_id: i64,
    liked: bool,
    #[serde(default)]
    features: Vec<f32>,
    created_at: DateTime,
}

impl MongoFeedbackDocument {
    /// Document for a vote recorded now.
    pub fn new(id: i64, feedback: NewFeedback) -> Self {
        Self {
            id,
            palette_id: feedback.palette_id as i64,
            liked: feedback.liked,
            features: feedback.features,
            created_at: DateTime::now(),
        }
    }
}

impl TryFrom<MongoFeedbackDocument> for FeedbackEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoFeedbackDocument) -> Result<Self, Self::Error> {
        let corrupted = |reason: &str| MongoDaoError::Corrupted {
            record: "feedback",
            id: value.id,
            reason: reason.to_owned(),
        };
        Ok(Self {
            id: u64::try_from(value.id).map_err(|_| corrupted("negative id"))?,
            palette_id: u64::try_from(value.palette_id)
                .map_err(|_| corrupted("negative palette id"))?,
            liked: value.liked,
            features: value.features,
            created_at: value.created_at.to_system_time(),
        })
    }
}

/// Sequence document backing auto-incremented ids.
#[derive(Debug, Deserialize)]
pub struct CounterDocument {
    /// Last id handed out.
    pub seq: i64,
}

/// Filter matching a numeric `_id`.
pub fn doc_id(id: i64) -> Document {
    doc! {"_id": id}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> NewPalette {
        NewPalette {
            colors: vec![HexColor::parse("#ABCDEF").unwrap()],
            source: PaletteSource::Image,
            image_path: Some("abc_photo.png".into()),
        }
    }

    #[test]
    fn palette_document_maps_back_to_entity() {
        let entity = PaletteEntity::try_from(MongoPaletteDocument::new(7, palette())).unwrap();
        assert_eq!(entity.id, 7);
        assert_eq!(entity.colors().count(), 1);
        assert_eq!(entity.image_path.as_deref(), Some("abc_photo.png"));
        assert_eq!((entity.likes, entity.dislikes), (0, 0));
    }

    #[test]
    fn negative_ids_are_corrupted() {
        let err = PaletteEntity::try_from(MongoPaletteDocument::new(-1, palette())).unwrap_err();
        assert!(matches!(err, MongoDaoError::Corrupted { id: -1, .. }));

        let feedback = MongoFeedbackDocument::new(
            3,
            NewFeedback {
                palette_id: 1,
                liked: true,
                features: vec![0.5; 15],
            },
        );
        let entity = FeedbackEntity::try_from(feedback).unwrap();
        assert_eq!((entity.id, entity.palette_id), (3, 1));
    }
}
