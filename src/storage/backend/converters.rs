use sea_orm::ActiveValue::Set;

use crate::storage::models::{Link, Platform, Stats};
use migration::entities::{link, stats};

pub fn model_to_link(model: link::Model) -> Link {
    Link {
        code: model.code,
        original_url: model.original_url,
        created_at: model.created_at,
    }
}

pub fn link_to_active_model(link: &Link) -> link::ActiveModel {
    link::ActiveModel {
        code: Set(link.code.clone()),
        original_url: Set(link.original_url.clone()),
        created_at: Set(link.created_at),
    }
}

pub fn model_to_stats(model: stats::Model) -> Stats {
    Stats {
        id: model.id,
        link_code: model.link_code,
        platform: Platform::parse_lossy(&model.platform),
        created_at: model.created_at,
    }
}

pub fn stats_to_active_model(stats: &Stats) -> stats::ActiveModel {
    stats::ActiveModel {
        id: Set(stats.id.clone()),
        link_code: Set(stats.link_code.clone()),
        platform: Set(stats.platform.to_string()),
        created_at: Set(stats.created_at),
    }
}
