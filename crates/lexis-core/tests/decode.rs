use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream;
use lexis_core::{DecodeError, StreamDecoder};
use lexis_store::TransportError;

/// Owns its chunks, so callers may pass temporary arrays
type Chunks = stream::Iter<std::vec::IntoIter<Result<Bytes, TransportError>>>;

fn chunks(parts: &[&[u8]]) -> Chunks {
    let items: Vec<Result<Bytes, TransportError>> = parts
        .iter()
        .map(|part| Ok(Bytes::copy_from_slice(part)))
        .collect();
    stream::iter(items)
}

async fn collect_ok(mut decoder: StreamDecoder<Chunks>) -> Vec<String> {
    let mut fragments = Vec::new();
    while let Some(fragment) = decoder.next_fragment().await {
        fragments.push(fragment.expect("fragment decodes"));
    }
    fragments
}

#[tokio::test]
async fn two_byte_character_split_between_chunks_arrives_once() {
    let decoder = StreamDecoder::new(chunks(&[b"caf\xC3".as_slice(), b"\xA9 au lait".as_slice()]));

    let fragments = collect_ok(decoder).await;

    assert_eq!(fragments, vec!["caf".to_string(), "\u{e9} au lait".to_string()]);
    let text = fragments.concat();
    assert_eq!(text.matches('\u{e9}').count(), 1);
    assert!(!text.contains('\u{fffd}'));
}

#[tokio::test]
async fn every_split_point_reconstructs_the_text() {
    let original = "naïve café ü 日本語 🙂 ok";
    let bytes = original.as_bytes();

    for split in 0..=bytes.len() {
        let (left, right) = bytes.split_at(split);
        let decoder = StreamDecoder::new(chunks(&[left, right]));
        assert_eq!(collect_ok(decoder).await.concat(), original, "split at {split}");
    }
}

#[tokio::test]
async fn single_byte_chunks_reconstruct_four_byte_characters() {
    let original = "🙂🙃";
    let parts: Vec<&[u8]> = original.as_bytes().chunks(1).collect();

    let fragments = collect_ok(StreamDecoder::new(chunks(&parts))).await;

    assert_eq!(fragments, vec!["🙂".to_string(), "🙃".to_string()]);
}

#[tokio::test]
async fn empty_chunks_produce_no_fragments() {
    let parts = [
        b"".as_slice(),
        b"A ".as_slice(),
        b"".as_slice(),
        b"happy".as_slice(),
    ];
    let fragments = collect_ok(StreamDecoder::new(chunks(&parts))).await;

    assert_eq!(fragments, vec!["A ".to_string(), "happy".to_string()]);
}

#[tokio::test]
async fn invalid_bytes_abort_the_sequence() {
    let parts = [b"ok ".as_slice(), b"\xFF\xFE".as_slice(), b"never".as_slice()];
    let mut decoder = StreamDecoder::new(chunks(&parts));

    assert_eq!(decoder.next_fragment().await.unwrap().unwrap(), "ok ");
    let err = decoder.next_fragment().await.unwrap().unwrap_err();
    assert!(matches!(err, DecodeError::InvalidUtf8 { offset: 3 }), "got {err:?}");
    assert!(decoder.next_fragment().await.is_none());
}

#[tokio::test]
async fn stream_ending_mid_character_is_truncated() {
    let mut decoder = StreamDecoder::new(chunks(&[b"end \xE2\x82".as_slice()]));

    assert_eq!(decoder.next_fragment().await.unwrap().unwrap(), "end ");
    let err = decoder.next_fragment().await.unwrap().unwrap_err();
    assert!(matches!(err, DecodeError::Truncated { pending: 2 }), "got {err:?}");
    assert!(decoder.next_fragment().await.is_none());
}

#[tokio::test]
async fn transport_error_ends_the_sequence() {
    let items: Vec<Result<Bytes, TransportError>> = vec![
        Ok(Bytes::from_static(b"partial")),
        Err(TransportError::Status { status: 502 }),
        Ok(Bytes::from_static(b"unreachable")),
    ];
    let mut decoder = StreamDecoder::new(stream::iter(items));

    assert_eq!(decoder.next_fragment().await.unwrap().unwrap(), "partial");
    let err = decoder.next_fragment().await.unwrap().unwrap_err();
    assert!(
        matches!(err, DecodeError::Transport(TransportError::Status { status: 502 })),
        "got {err:?}"
    );
    assert!(decoder.next_fragment().await.is_none());
}

#[tokio::test]
async fn into_stream_yields_the_same_fragments() {
    let parts = [b"A ".as_slice(), b"happy ".as_slice(), b"accident.".as_slice()];
    let decoder = StreamDecoder::new(chunks(&parts));

    let fragments: Vec<String> = decoder
        .into_stream()
        .map(|fragment| fragment.expect("fragment decodes"))
        .collect()
        .await;

    assert_eq!(fragments.concat(), "A happy accident.");
}
