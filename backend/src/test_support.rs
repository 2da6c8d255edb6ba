//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for `cfg(test)` and the `test-support` feature.

pub mod clock {
    //! A clock tests can move forward.

    use std::sync::{Mutex, MutexGuard};

    use chrono::{DateTime, Local, TimeDelta, Utc};
    use mockable::Clock;

    /// Clock frozen at a chosen instant until advanced.
    #[derive(Debug)]
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        /// Freeze the clock at `now`.
        #[must_use]
        pub const fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        /// Move the clock forward by `delta`.
        pub fn advance(&self, delta: TimeDelta) {
            *self.lock_clock() += delta;
        }

        /// Move the clock forward by whole minutes.
        pub fn advance_minutes(&self, minutes: i64) {
            self.advance(TimeDelta::minutes(minutes));
        }

        fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
            self.0
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}

pub mod notifications {
    //! Notification doubles that record instead of delivering.

    use std::collections::VecDeque;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use async_trait::async_trait;

    use crate::domain::ports::{
        NotificationSink, NotificationSinkError, PushDeliveryError, PushTransport,
    };
    use crate::domain::{
        DispatchRequest, NotificationKind, PushMessage, PushSubscription, SubscriptionId,
    };

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sink that keeps every submitted request.
    #[derive(Debug, Default)]
    pub struct RecordingNotificationSink {
        requests: Mutex<Vec<DispatchRequest>>,
    }

    impl RecordingNotificationSink {
        /// Every request submitted so far.
        pub fn requests(&self) -> Vec<DispatchRequest> {
            lock(&self.requests).clone()
        }

        /// Kinds of every request submitted so far.
        pub fn kinds(&self) -> Vec<NotificationKind> {
            lock(&self.requests)
                .iter()
                .map(|request| request.event.kind())
                .collect()
        }
    }

    impl NotificationSink for RecordingNotificationSink {
        fn submit(&self, request: DispatchRequest) -> Result<(), NotificationSinkError> {
            lock(&self.requests).push(request);
            Ok(())
        }
    }

    /// Transport that answers from a script and records each send.
    ///
    /// Outcomes are consumed in order; once the script runs out every send
    /// succeeds.
    #[derive(Debug, Default)]
    pub struct ScriptedPushTransport {
        script: Mutex<VecDeque<Result<(), PushDeliveryError>>>,
        sent: Mutex<Vec<(SubscriptionId, PushMessage)>>,
    }

    impl ScriptedPushTransport {
        /// Transport that returns `outcomes` in order.
        #[must_use]
        pub fn with_outcomes(outcomes: impl IntoIterator<Item = Result<(), PushDeliveryError>>)
        -> Self {
            Self {
                script: Mutex::new(outcomes.into_iter().collect()),
                sent: Mutex::new(Vec::new()),
            }
        }

        /// Every `(subscription, message)` pair sent so far.
        pub fn sent(&self) -> Vec<(SubscriptionId, PushMessage)> {
            lock(&self.sent).clone()
        }
    }

    #[async_trait]
    impl PushTransport for ScriptedPushTransport {
        async fn send(
            &self,
            subscription: &PushSubscription,
            message: &PushMessage,
        ) -> Result<(), PushDeliveryError> {
            lock(&self.sent).push((subscription.id, message.clone()));
            lock(&self.script).pop_front().unwrap_or(Ok(()))
        }
    }
}

pub mod pairs {
    //! Ready-made pairs.

    use crate::domain::{Member, PairActor, PairId, PairMembership, UserId};

    /// Alice and Bob, members of one complete pair.
    #[derive(Debug, Clone)]
    pub struct AliceAndBob {
        /// The pair.
        pub pair_id: PairId,
        /// Alice.
        pub alice: Member,
        /// Bob.
        pub bob: Member,
    }

    impl AliceAndBob {
        /// Fresh identities for both members and the pair.
        #[must_use]
        pub fn new() -> Self {
            Self {
                pair_id: PairId::random(),
                alice: Member {
                    id: UserId::random(),
                    display_name: "Alice".to_owned(),
                },
                bob: Member {
                    id: UserId::random(),
                    display_name: "Bob".to_owned(),
                },
            }
        }

        /// Alice acting in the pair.
        #[must_use]
        pub const fn alice_actor(&self) -> PairActor {
            PairActor::new(self.pair_id, self.alice.id)
        }

        /// Bob acting in the pair.
        #[must_use]
        pub const fn bob_actor(&self) -> PairActor {
            PairActor::new(self.pair_id, self.bob.id)
        }

        /// The pair as Alice sees it.
        #[must_use]
        pub fn as_alice(&self) -> PairMembership {
            PairMembership {
                pair_id: self.pair_id,
                member: self.alice.clone(),
                partner: self.bob.clone(),
            }
        }

        /// The pair as Bob sees it.
        #[must_use]
        pub fn as_bob(&self) -> PairMembership {
            PairMembership {
                pair_id: self.pair_id,
                member: self.bob.clone(),
                partner: self.alice.clone(),
            }
        }

        /// Membership for whichever of the two `user_id` is.
        #[must_use]
        pub fn membership_for(&self, user_id: &UserId) -> Option<PairMembership> {
            if *user_id == self.alice.id {
                Some(self.as_alice())
            } else if *user_id == self.bob.id {
                Some(self.as_bob())
            } else {
                None
            }
        }
    }

    impl Default for AliceAndBob {
        fn default() -> Self {
            Self::new()
        }
    }
}
