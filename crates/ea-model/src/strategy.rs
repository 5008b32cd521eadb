//! Heating control.

use ea_core::DwellingId;

use crate::{ModelError, ModelResult, OccupantStatus};

/// Decides a dwelling's heating set point [℃] from who is inside.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum HeatingStrategy {
    /// Never heat.
    #[default]
    NoHeating,
    /// Always heat to the same set point.
    Constant(f64),
    /// Heat only while someone is home, to a lower set point while everyone
    /// present is asleep.
    PresenceBased { active: f64, asleep: f64 },
}

impl HeatingStrategy {
    /// The set point for the next step, or `None` for no heating.
    ///
    /// `occupants` are the people currently inside `dwelling`; any of them
    /// in a non-home activity is an error.
    pub fn set_point(
        &self,
        dwelling: DwellingId,
        occupants: &[OccupantStatus],
    ) -> ModelResult<Option<f64>> {
        match *self {
            HeatingStrategy::NoHeating => Ok(None),
            HeatingStrategy::Constant(set_point) => Ok(Some(set_point)),
            HeatingStrategy::PresenceBased { active, asleep } => {
                if let Some(stray) = occupants.iter().find(|o| !o.activity.is_at_home()) {
                    return Err(ModelError::InconsistentOccupancy {
                        dwelling,
                        person: stray.person,
                        activity: stray.activity,
                    });
                }
                if occupants.is_empty() {
                    Ok(None)
                } else if occupants.iter().all(|o| o.activity.is_asleep()) {
                    Ok(Some(asleep))
                } else {
                    Ok(Some(active))
                }
            }
        }
    }
}
