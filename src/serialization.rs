//! Serde helpers shared by the serializable types.

use serde::Serializer;

/// Serializes a byte buffer as standard base64 text.
pub(crate) fn as_base64<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&data_encoding::BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Payload {
        #[serde(serialize_with = "super::as_base64")]
        data: Vec<u8>,
    }

    #[test]
    fn test_as_base64() {
        let payload = Payload {
            data: vec![0xFC, 0x30, 0x11],
        };
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"data":"/DAR"}"#);
    }
}
