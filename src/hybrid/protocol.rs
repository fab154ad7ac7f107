//! Action codes exchanged with the experimental control

/// Control message tag, carried as the first entry of every received vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
    /// New target response follows in the same message
    SetTrialResponse,
    /// Peer requests the measured response
    GetForce,
    /// Peer ends the simulation
    Terminate,
}

impl RemoteAction {
    pub const fn code(self) -> f64 {
        match self {
            RemoteAction::SetTrialResponse => 3.0,
            RemoteAction::GetForce => 10.0,
            RemoteAction::Terminate => 99.0,
        }
    }

    /// Decode a wire value; unknown codes yield `None`
    pub fn from_code(code: f64) -> Option<Self> {
        [
            RemoteAction::SetTrialResponse,
            RemoteAction::GetForce,
            RemoteAction::Terminate,
        ]
        .into_iter()
        .find(|a| a.code() == code)
    }

    pub const fn name(self) -> &'static str {
        match self {
            RemoteAction::SetTrialResponse => "setTrialResponse",
            RemoteAction::GetForce => "getForce",
            RemoteAction::Terminate => "terminate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(RemoteAction::from_code(10.0), Some(RemoteAction::GetForce));
        assert_eq!(RemoteAction::from_code(3.0), Some(RemoteAction::SetTrialResponse));
        assert_eq!(RemoteAction::from_code(99.0), Some(RemoteAction::Terminate));
        assert_eq!(RemoteAction::from_code(4.0), None);
    }
}
