//! Integration tests for serde serialization

#[cfg(feature = "serde")]
#[cfg(test)]
mod tests {
    use data_encoding::BASE64;
    use scte35_cue::builders::{SegmentationDescriptorBuilder, SpliceInfoSectionBuilder, TimeSignalBuilder};
    use scte35_cue::*;
    use serde_json::{Value, json};

    fn section_json(base64_message: &str) -> Value {
        let buffer = BASE64.decode(base64_message.as_bytes()).unwrap();
        let section = parse_splice_info_section(&buffer).unwrap();
        serde_json::to_value(&section).unwrap()
    }

    #[test]
    fn test_time_signal_serialization() {
        let json = section_json("/DAWAAAAAAAAAP/wBQb+Qjo1vQAAuwxz9A==");

        assert_eq!(
            json,
            json!({
                "sap_type": "Unspecified",
                "pts_adjustment": 0,
                "cw_index": 0,
                "tier": 4095,
                "splice_command": {
                    "TimeSignal": { "splice_time": { "pts_time": 1_111_111_101u64 } }
                },
                "splice_descriptors": [],
                "pts": 1_111_111_101u64,
            })
        );
    }

    #[test]
    fn test_splice_insert_serialization() {
        let json = section_json("/DAvAAAAAAAA///wFAVIAACPf+/+c2nALv4AUsz1AAAAAAAKAAhDVUVJAAABNWLbowo=");

        let insert = &json["splice_command"]["SpliceInsert"];
        assert_eq!(insert["splice_event_id"], 0x4800_008f_u32);
        assert_eq!(insert["out_of_network_indicator"], true);
        assert_eq!(insert["splice_time"]["pts_time"], 0x0_7369_c02e_u64);
        assert_eq!(
            insert["break_duration"],
            json!({ "auto_return": true, "duration": 0x0052_ccf5 })
        );
        assert_eq!(insert["components"], json!([]));

        // opaque descriptors keep their payload as base64
        assert_eq!(
            json["splice_descriptors"][0],
            json!({ "Unknown": { "tag": 0, "data": "Q1VFSQAAATU=" } })
        );
    }

    #[test]
    fn test_segmentation_descriptor_serialization() {
        let json = section_json("/DAvAAAAAAAA///wBQb+dGKQoAAZAhdDVUVJSAAAjn+fCAgAAAAALKChijUCAKnMZ1g=");

        let descriptor = &json["splice_descriptors"][0]["Segmentation"];
        assert_eq!(descriptor["segmentation_event_id"], 0x4800_008e_u32);
        assert_eq!(descriptor["segmentation_type"], "ProviderPlacementOpportunityEnd");
        assert_eq!(
            descriptor["segmentation_upid"],
            json!({ "Single": { "upid_type": "AiringID", "value": "AAAAACygoYo=" } })
        );
        assert_eq!(descriptor["segment_num"], 2);
        assert_eq!(descriptor["sub_segment_num"], Value::Null);
        // the descriptor carries the PTS of its signal
        assert_eq!(descriptor["pts"], json["pts"]);
        assert!(descriptor["pts"].is_u64());
    }

    #[test]
    fn test_mpu_upid_serialization() {
        let json = section_json("/DAsAAAAAAAAAP/wBQb+7YaD1QAWAhRDVUVJAADc8X+/DAVPVkxZSSIAAJ6Gk2Q=");

        let descriptor = &json["splice_descriptors"][0]["Segmentation"];
        assert_eq!(descriptor["segmentation_type"], "BreakStart");
        assert_eq!(descriptor["segmentation_upid"]["Single"]["upid_type"], "MPU");
        // base64 of "OVLYI"
        assert_eq!(descriptor["segmentation_upid"]["Single"]["value"], "T1ZMWUk=");
    }

    #[test]
    fn test_mid_upid_serialization() {
        let descriptor = SegmentationDescriptorBuilder::new(5, SegmentationType::ProgramStart)
            .mid(vec![
                Upid::new(SegmentationUpidType::ADI, b"BLACKOUT:1".to_vec()),
                Upid::new(SegmentationUpidType::URI, b"urn:x".to_vec()),
            ])
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            json["segmentation_upid"],
            json!({
                "Mid": [
                    { "upid_type": "ADI", "value": "QkxBQ0tPVVQ6MQ==" },
                    { "upid_type": "URI", "value": "dXJuOng=" },
                ]
            })
        );
        assert_eq!(json["pts"], Value::Null);
    }

    #[test]
    fn test_built_section_serialization() {
        let section = SpliceInfoSectionBuilder::new()
            .pts_adjustment(10)
            .time_signal(TimeSignalBuilder::new().at(Pts::new(MAX_PTS)).build().unwrap())
            .add_segmentation_descriptor(
                SegmentationDescriptorBuilder::new(1, SegmentationType::ChapterStart)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let json = serde_json::to_value(&section).unwrap();
        // PTS values are plain tick counts, adjusted and wrapped
        assert_eq!(json["splice_command"]["TimeSignal"]["splice_time"]["pts_time"], MAX_PTS);
        assert_eq!(json["pts"], 9);
        assert_eq!(json["splice_descriptors"][0]["Segmentation"]["pts"], 9);
    }

    #[test]
    fn test_enum_serialization() {
        assert_eq!(
            serde_json::to_string(&SegmentationType::ProviderAdvertisementStart).unwrap(),
            "\"ProviderAdvertisementStart\""
        );
        assert_eq!(
            serde_json::to_string(&SegmentationType::Reserved(0xFE)).unwrap(),
            "{\"Reserved\":254}"
        );
        assert_eq!(serde_json::to_string(&SegmentationUpidType::AdID).unwrap(), "\"AdID\"");
        assert_eq!(serde_json::to_string(&Pts::new(90_000)).unwrap(), "90000");
    }
}
