//! Schema migration framework.

use crate::StudyError;
use crate::schema::Study;

pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut study: Study) -> Result<Study, StudyError> {
    while study.version < LATEST_VERSION {
        study = migrate_one_version(study)?;
    }
    Ok(study)
}

fn migrate_one_version(study: Study) -> Result<Study, StudyError> {
    match study.version {
        0 => migrate_v0_to_v1(study),
        1 => migrate_v1_to_v2(study),
        v => Err(StudyError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v0_to_v1(mut study: Study) -> Result<Study, StudyError> {
    study.version = 1;
    Ok(study)
}

/// Version 2 moves the infusion rate from the animal onto each tracer.
fn migrate_v1_to_v2(mut study: Study) -> Result<Study, StudyError> {
    for animal in &mut study.animals {
        let Some(rate) = animal.infusion_rate else {
            continue;
        };
        for tracer in &mut animal.infusate {
            if tracer.infusion_rate.is_none() {
                tracer.infusion_rate = Some(rate);
            }
        }
    }

    study.version = 2;
    Ok(study)
}
