//! Default office used when no desk configuration is supplied.
//!
//! Eight desks in three rows: leadership at the back (`z = -12`), the
//! department row in the middle (`z = -6` to `z = -4`), and the review and
//! design desks at the front (`z = 2`). The analyst desk sits on the line
//! between the trade master and the full-stack desk, so that trip detours.

use workfloor_types::{AgentId, Position, Tier};

use crate::error::WorldError;
use crate::layout::DeskLayout;
use crate::org_chart::OrgChart;

/// Desk and tier of every agent in the default office.
const DEFAULT_DESKS: &[(&str, f64, f64, Tier)] = &[
    ("commander", 0.0, -12.0, Tier::Commander),
    ("supervisor", -8.0, -12.0, Tier::Supervisor),
    ("trade-master", -8.0, -6.0, Tier::Director),
    ("data-engineer", 8.0, -6.0, Tier::Director),
    ("analyst", -4.0, -5.0, Tier::Worker),
    ("full-stack", 0.0, -4.0, Tier::Worker),
    ("reviewer", -8.0, 2.0, Tier::Worker),
    ("designer", 8.0, 2.0, Tier::Worker),
];

/// Build the default desk layout and org chart.
///
/// # Errors
///
/// Returns [`WorldError::DuplicateDesk`] if the desk table lists an agent
/// twice.
pub fn create_default_office() -> Result<(DeskLayout, OrgChart), WorldError> {
    let mut layout = DeskLayout::new();
    let mut org = OrgChart::new();

    for &(slug, x, z, tier) in DEFAULT_DESKS {
        layout.insert(AgentId::from(slug), Position::ground(x, z))?;
        org.insert(AgentId::from(slug), tier);
    }

    tracing::debug!(desks = layout.len(), "Default office created");
    Ok((layout, org))
}
