//! Interactive prediction state machine
//!
//! The controller owns the two fighter inputs and the current [`ViewState`].
//! Submitting is split into two halves so that a view can run several
//! requests at once:
//!
//! 1. [`PredictionViewController::begin_submit`] validates the inputs, moves
//!    to `Loading` and hands out a [`Submission`] tagged with a fresh token.
//! 2. [`PredictionViewController::apply`] takes the finished [`Completion`]
//!    and updates the state only if its token is still the latest one.
//!
//! A late response from an older submission is dropped, so the state always
//! reflects the most recent submit.
//!
//! # Example
//!
//! ```no_run
//! use ufc_predictor::{ClientConfig, PredictionClient, PredictionViewController};
//!
//! # async fn run() -> Result<(), ufc_predictor::PredictionError> {
//! let client = PredictionClient::new(ClientConfig::default())?;
//! let mut controller = PredictionViewController::new();
//! controller.edit_fighter1("Jon Jones");
//! controller.edit_fighter2("Stipe Miocic");
//! controller.submit(&client).await;
//! println!("{:?}", controller.state());
//! # Ok(())
//! # }
//! ```

use tracing::debug;

use crate::client::PredictionService;
use crate::error::{validate_fighter_pair, PredictionError};
use crate::models::{FighterName, PredictionRequest, PredictionResult};

/// What the view should display
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    Success(PredictionResult),
    Failure(String),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// Monotonic identifier attached to each submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// An accepted submit waiting to be sent
#[derive(Debug, Clone)]
pub struct Submission {
    pub token: RequestToken,
    pub request: PredictionRequest,
}

impl Submission {
    /// Perform the prediction call and tag the outcome with this submission's token
    pub async fn send<S>(self, service: &S) -> Completion
    where
        S: PredictionService + ?Sized,
    {
        let outcome = service.predict(&self.request).await;
        Completion {
            token: self.token,
            outcome,
        }
    }
}

/// Outcome of a submission, ready to be applied to the controller
#[derive(Debug, Clone)]
pub struct Completion {
    pub token: RequestToken,
    pub outcome: Result<PredictionResult, PredictionError>,
}

/// Owns the fighter inputs and drives Idle → Loading → Success/Failure
#[derive(Debug, Clone)]
pub struct PredictionViewController {
    fighter1: String,
    fighter2: String,
    state: ViewState,
    latest_token: u64,
}

impl Default for PredictionViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionViewController {
    pub fn new() -> Self {
        Self {
            fighter1: String::new(),
            fighter2: String::new(),
            state: ViewState::Idle,
            latest_token: 0,
        }
    }

    pub fn fighter1(&self) -> &str {
        &self.fighter1
    }

    pub fn fighter2(&self) -> &str {
        &self.fighter2
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Editing is allowed in every state and never changes the state
    pub fn edit_fighter1(&mut self, text: impl Into<String>) {
        self.fighter1 = text.into();
    }

    pub fn edit_fighter2(&mut self, text: impl Into<String>) {
        self.fighter2 = text.into();
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Whether a submit control should be enabled
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && validate_fighter_pair(&self.fighter1, &self.fighter2).is_ok()
    }

    /// Token of the most recent submit, if any
    pub fn latest_token(&self) -> Option<RequestToken> {
        (self.latest_token > 0).then_some(RequestToken(self.latest_token))
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.state {
            ViewState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ViewState::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Validate the inputs and start a new submission
    ///
    /// Every call issues a new token, so any request still in flight is
    /// superseded even when validation fails. Returns `None` on validation
    /// failure, with the state set to `Failure`.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        self.latest_token += 1;
        let token = RequestToken(self.latest_token);

        let request = match self.build_request() {
            Ok(request) => request,
            Err(err) => {
                debug!("Submit #{} rejected: {}", token.0, err);
                self.state = ViewState::Failure(err.to_string());
                return None;
            }
        };

        debug!(
            "Submit #{}: {} vs {}",
            token.0, request.red_fighter, request.blue_fighter
        );
        self.state = ViewState::Loading;
        Some(Submission { token, request })
    }

    fn build_request(&self) -> Result<PredictionRequest, PredictionError> {
        validate_fighter_pair(&self.fighter1, &self.fighter2)?;
        Ok(PredictionRequest::new(
            FighterName::parse(&self.fighter1)?,
            FighterName::parse(&self.fighter2)?,
        ))
    }

    /// Apply a finished submission; returns false if it was stale and discarded
    pub fn apply(&mut self, completion: Completion) -> bool {
        if self.latest_token == 0 || completion.token.0 != self.latest_token {
            debug!(
                "Discarding stale response #{} (latest is #{})",
                completion.token.0, self.latest_token
            );
            return false;
        }

        self.state = match completion.outcome {
            Ok(result) => {
                debug!("Response #{}: winner {}", completion.token.0, result.winner);
                ViewState::Success(result)
            }
            Err(err) => {
                debug!("Response #{} failed: {}", completion.token.0, err);
                ViewState::Failure(err.to_string())
            }
        };
        true
    }

    /// Validate, call the service and apply the outcome in one step
    pub async fn submit<S>(&mut self, service: &S) -> &ViewState
    where
        S: PredictionService + ?Sized,
    {
        if let Some(submission) = self.begin_submit() {
            let completion = submission.send(service).await;
            self.apply(completion);
        }
        &self.state
    }
}
