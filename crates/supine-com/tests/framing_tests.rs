use supine_com::framing::{read_frame, write_frame};
use supine_com::ComError;
use tokio::io::AsyncWriteExt;
use tokio::time::{timeout, Duration};

async fn roundtrip(payload: &[u8]) -> Vec<u8> {
    let (mut client, mut server) = tokio::io::duplex(64 * 1024);

    let bytes = payload.to_vec();
    let writer = tokio::spawn(async move {
        write_frame(&mut client, &bytes).await.expect("write failed");
    });

    let received = read_frame(&mut server).await.expect("read failed");
    writer.await.unwrap();
    received
}

#[tokio::test]
async fn test_roundtrip_empty_payload() {
    assert_eq!(roundtrip(&[]).await, Vec::<u8>::new());
}

#[tokio::test]
async fn test_roundtrip_single_byte() {
    assert_eq!(roundtrip(&[0x42]).await, vec![0x42]);
}

#[tokio::test]
async fn test_roundtrip_multi_megabyte() {
    let payload: Vec<u8> = (0..3 * 1024 * 1024u32).map(|i| (i % 251) as u8).collect();
    assert_eq!(roundtrip(&payload).await, payload);
}

#[tokio::test]
async fn test_clean_close_before_prefix() {
    let (client, mut server) = tokio::io::duplex(1024);
    drop(client);

    match read_frame(&mut server).await {
        Err(ComError::ConnectionClosed) => {}
        other => panic!("Expected ConnectionClosed, got {:?}", other.map(|v| v.len())),
    }
}

#[tokio::test]
async fn test_truncated_prefix() {
    let (mut client, mut server) = tokio::io::duplex(1024);

    // Two of the four prefix bytes, then close
    client.write_all(&[0x00, 0x00]).await.unwrap();
    drop(client);

    match read_frame(&mut server).await {
        Err(ComError::Truncated { .. }) => {}
        other => panic!("Expected Truncated, got {:?}", other.map(|v| v.len())),
    }
}

#[tokio::test]
async fn test_truncated_payload_errors_instead_of_hanging() {
    let (mut client, mut server) = tokio::io::duplex(1024);

    // Valid prefix announcing 100 bytes, but only 10 arrive
    client.write_all(&100u32.to_be_bytes()).await.unwrap();
    client.write_all(&[0xab; 10]).await.unwrap();
    drop(client);

    let result = timeout(Duration::from_secs(5), read_frame(&mut server))
        .await
        .expect("read hung on truncated stream");
    match result {
        Err(ComError::Truncated { .. }) => {}
        other => panic!("Expected Truncated, got {:?}", other.map(|v| v.len())),
    }
}

#[tokio::test]
async fn test_zero_length_frame_is_legal() {
    let (mut client, mut server) = tokio::io::duplex(1024);

    write_frame(&mut client, &[]).await.unwrap();
    write_frame(&mut client, &[7, 8, 9]).await.unwrap();

    // The empty frame arrives as an empty payload, then the stream continues
    assert_eq!(read_frame(&mut server).await.unwrap(), Vec::<u8>::new());
    assert_eq!(read_frame(&mut server).await.unwrap(), vec![7, 8, 9]);
}

#[tokio::test]
async fn test_frames_preserve_boundaries() {
    let (mut client, mut server) = tokio::io::duplex(64 * 1024);

    let first: Vec<u8> = vec![1; 1000];
    let second: Vec<u8> = vec![2; 500];
    write_frame(&mut client, &first).await.unwrap();
    write_frame(&mut client, &second).await.unwrap();

    assert_eq!(read_frame(&mut server).await.unwrap(), first);
    assert_eq!(read_frame(&mut server).await.unwrap(), second);
}
