//! Write trace delivery
//!
//! Traces are best effort: a full, closed or missing sink drops them and
//! writes complete regardless.

mod support;

use std::time::Duration;

use p4write::trace::trace_channel;
use p4write::{Code, Status, WriteClient, WriteConfig};
use support::{shared, tagged_batch, wait_until, within, ScriptedTransport};

#[tokio::test]
async fn test_trace_reports_batch_outcome() {
    let transport = shared(ScriptedTransport::new().with_delay(Duration::from_millis(5)));
    transport.push_outcome(Err(Status::new(Code::ResourceExhausted, "table full")));
    let client = WriteClient::start(transport.clone(), WriteConfig::default()).unwrap();
    let mut traces = client.trace_channel();

    let results = within(client.write(&tagged_batch(1, 3)).await.unwrap().recv())
        .await
        .unwrap();
    let trace = within(traces.recv()).await.unwrap();

    assert_eq!(trace.batch_size, 3);
    assert_eq!(trace.results, results);
    assert_eq!(trace.failed_items(), 3);
    assert!(trace.duration >= Duration::from_millis(5));
}

#[tokio::test]
async fn test_full_trace_sink_never_blocks_writes() {
    let transport = shared(ScriptedTransport::new());
    let client = WriteClient::start(transport.clone(), WriteConfig::default()).unwrap();
    let (tx, _unread) = trace_channel(1);
    client.set_trace_sink(Some(tx));

    for tag in 0..5 {
        let sink = client.write(&tagged_batch(tag, 2)).await.unwrap();
        assert_eq!(within(sink.recv()).await.unwrap().len(), 2);
    }

    wait_until(|| {
        let metrics = client.metrics();
        metrics.traces_delivered + metrics.traces_dropped == 5
    })
    .await;
    let metrics = client.metrics();
    assert_eq!(metrics.traces_delivered, 1);
    assert_eq!(metrics.traces_dropped, 4);
}

#[tokio::test]
async fn test_closed_trace_sink_is_dropped_silently() {
    let transport = shared(ScriptedTransport::new());
    let client = WriteClient::start(transport.clone(), WriteConfig::default()).unwrap();
    drop(client.trace_channel());

    let sink = client.write(&tagged_batch(1, 1)).await.unwrap();
    assert!(within(sink.recv()).await.unwrap()[0].is_ok());

    wait_until(|| client.metrics().traces_dropped == 1).await;
}

#[tokio::test]
async fn test_no_sink_no_traces() {
    let transport = shared(ScriptedTransport::new());
    let client = WriteClient::start(transport.clone(), WriteConfig::default()).unwrap();
    let mut traces = client.trace_channel();
    client.set_trace_sink(None);

    let sink = client.write(&tagged_batch(1, 1)).await.unwrap();
    within(sink.recv()).await.unwrap();

    wait_until(|| client.metrics().batches_dispatched == 1).await;
    assert!(traces.try_recv().is_err());
    let metrics = client.metrics();
    assert_eq!(metrics.traces_delivered, 0);
    assert_eq!(metrics.traces_dropped, 0);
}

#[tokio::test]
async fn test_sink_can_be_swapped() {
    let transport = shared(ScriptedTransport::new());
    let client = WriteClient::start(transport.clone(), WriteConfig::default()).unwrap();

    let (first_tx, mut first_rx) = trace_channel(4);
    client.set_trace_sink(Some(first_tx));
    let sink = client.write(&tagged_batch(1, 1)).await.unwrap();
    within(sink.recv()).await.unwrap();
    let trace = within(first_rx.recv()).await.unwrap();
    assert_eq!(trace.batch_size, 1);

    let (second_tx, mut second_rx) = trace_channel(4);
    client.set_trace_sink(Some(second_tx));
    let sink = client.write(&tagged_batch(2, 2)).await.unwrap();
    within(sink.recv()).await.unwrap();
    let trace = within(second_rx.recv()).await.unwrap();
    assert_eq!(trace.batch_size, 2);

    // The first sink's sender was replaced, so its channel is now closed
    assert!(first_rx.recv().await.is_none());
}
