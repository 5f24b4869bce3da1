//! Core events emitted by the engine

use curfew_api::FieldKind;
use curfew_util::GroupName;

/// What a mutation changed. An operation that changes nothing emits no events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    GroupCreated {
        group: GroupName,
    },

    DomainAdded {
        group: GroupName,
        domain: String,
    },

    /// Hour selection replaced; carries the resulting tokens
    HoursChanged {
        group: GroupName,
        hours: Vec<String>,
    },

    /// Day selection replaced; carries the resulting tokens
    DaysChanged {
        group: GroupName,
        days: Vec<String>,
    },

    ValueRemoved {
        group: GroupName,
        field: FieldKind,
        value: String,
    },

    FieldEmptied {
        group: GroupName,
        field: FieldKind,
    },

    GroupRemoved {
        group: GroupName,
    },

    Activated {
        group: GroupName,
    },

    Deactivated {
        group: GroupName,
    },
}
