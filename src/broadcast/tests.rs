use super::{BroadcastSink, ChannelSink, NoopSink};

#[test]
fn test_noop_sink_accepts_everything() {
    assert!(NoopSink.publish(b"anything").is_ok());
}

#[test]
fn test_channel_sink_without_receivers_succeeds() {
    let sink = ChannelSink::new(4);
    assert_eq!(sink.receiver_count(), 0);
    assert!(sink.publish(b"nobody listening").is_ok());

    // a receiver attached later starts from the next payload
    let mut rx = sink.subscribe();
    sink.publish(b"heard").unwrap();
    assert_eq!(&*rx.try_recv().unwrap(), b"heard");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_channel_sink_fans_out_to_receivers() {
    let sink = ChannelSink::new(4);
    let mut rx_a = sink.subscribe();
    let mut rx_b = sink.subscribe();
    assert_eq!(sink.receiver_count(), 2);

    sink.publish(b"payload").unwrap();

    assert_eq!(&*rx_a.recv().await.unwrap(), b"payload");
    assert_eq!(&*rx_b.recv().await.unwrap(), b"payload");
}

#[test]
fn test_channel_sink_never_blocks_on_lagging_receiver() {
    let sink = ChannelSink::new(1);
    let mut rx = sink.subscribe();

    for i in 0..5u8 {
        sink.publish(&[i]).unwrap();
    }

    // receiver lagged: the oldest payloads were overwritten
    assert!(matches!(
        rx.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Lagged(_))
    ));
    assert_eq!(&*rx.try_recv().unwrap(), &[4u8]);
}
