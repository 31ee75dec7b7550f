use futures::{stream, Future, StreamExt as _, TryStreamExt as _};

/// Split `ids` into chunks of `batch_size`, fetch every chunk with at most `concurrency` requests in
/// flight and flatten the results in chunk order.
///
/// All chunks are awaited before returning. The first failing chunk fails the whole call.
pub async fn fetch_batched<T, E, F, Fut>(
    ids: &[String], batch_size: usize, concurrency: usize, fetch: F,
) -> Result<Vec<T>, E>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let batches: Vec<Vec<String>> = ids.chunks(batch_size.max(1)).map(<[String]>::to_vec).collect();

    tracing::debug!(ids = ids.len(), batches = batches.len(), "fetching in batches");

    let results: Vec<Vec<T>> = stream::iter(batches)
        .map(fetch)
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    Ok(results.into_iter().flatten().collect())
}

/// Run `fetch` for every item with at most `concurrency` in flight and concatenate the results in
/// input order. `fetch` is expected to absorb its own failures.
pub async fn fan_out<I, T, F, Fut>(items: I, concurrency: usize, fetch: F) -> Vec<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Vec<T>>,
{
    stream::iter(items)
        .map(fetch)
        .buffered(concurrency.max(1))
        .concat()
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("id-{i}")).collect()
    }

    #[tokio::test]
    async fn splits_into_fixed_size_batches_and_keeps_order() {
        let sizes = Mutex::new(Vec::new());

        let result: Result<Vec<String>, ()> = fetch_batched(&ids(120), 50, 4, |batch| {
            sizes.lock().unwrap().push(batch.len());
            async move { Ok(batch) }
        })
        .await;

        assert_eq!(result.unwrap(), ids(120));
        assert_eq!(*sizes.lock().unwrap(), vec![50, 50, 20]);
    }

    #[tokio::test]
    async fn empty_input_issues_no_calls() {
        let calls = AtomicUsize::new(0);

        let result: Result<Vec<String>, ()> = fetch_batched(&[], 50, 4, |batch| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(batch) }
        })
        .await;

        assert_eq!(result.unwrap(), Vec::<String>::new());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn a_failing_batch_fails_the_call() {
        let result: Result<Vec<String>, String> =
            fetch_batched(&ids(75), 50, 2, |batch| async move {
                if batch.len() < 50 {
                    Err("second batch failed".to_string())
                } else {
                    Ok(batch)
                }
            })
            .await;

        assert_eq!(result, Err("second batch failed".to_string()));
    }

    #[tokio::test]
    async fn never_exceeds_the_concurrency_limit() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        let result: Result<Vec<String>, ()> = fetch_batched(&ids(500), 50, 3, |batch| {
            let in_flight = &in_flight;
            let peak = &peak;
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(batch)
            }
        })
        .await;

        assert_eq!(result.unwrap().len(), 500);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn fan_out_concatenates_in_input_order() {
        let result = fan_out(vec![3, 1, 2], 2, |n| async move { vec![n; n] }).await;
        assert_eq!(result, vec![3, 3, 3, 1, 2, 2]);
    }
}
