//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use innkeeper_core::async_effect;
///
/// async_effect! {
///     match processor.process_payment(amount).await {
///         Ok(receipt) => Some(HotelAction::PaymentSucceeded { reservation_id, receipt }),
///         Err(error) => Some(HotelAction::PaymentFailed { reservation_id, reason: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Charged { cents: u64 },
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::Charged { cents: 10_000 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[tokio::test]
    async fn test_async_effect_captures_by_move() {
        let cents = 15_000;
        let effect = async_effect! {
            Some(TestAction::Charged { cents })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! always builds a future");
        };
        assert_eq!(fut.await, Some(TestAction::Charged { cents: 15_000 }));
    }
}
