//! Tests for the builder API.

use super::*;
use crate::descriptors::{Component, DeliveryRestrictions, DeviceRestrictions};
use crate::parser::parse_splice_info_section;
use crate::pts::Pts;
use crate::time::SpliceTime;
use crate::types::{SegmentationType, SpliceCommand, SpliceInsert, SpliceInsertComponent};
use crate::upid::{SegmentationUpid, SegmentationUpidType, Upid};
use std::time::Duration;

mod builder_tests {
    use super::*;

    #[test]
    fn test_splice_insert_builder_basic() {
        let splice_insert = SpliceInsertBuilder::new(12345)
            .immediate()
            .duration(Duration::from_secs(30))
            .unique_program_id(0x1234)
            .avail(1, 4)
            .build()
            .unwrap();

        assert_eq!(splice_insert.splice_event_id, 12345);
        assert!(!splice_insert.splice_event_cancel_indicator);
        assert!(splice_insert.splice_immediate_flag);
        assert!(splice_insert.duration_flag());
        assert_eq!(splice_insert.splice_time, None);
        assert_eq!(splice_insert.unique_program_id, 0x1234);
        assert_eq!(splice_insert.avail_num, 1);
        assert_eq!(splice_insert.avails_expected, 4);
        assert_eq!(
            splice_insert.break_duration.map(|duration| duration.duration),
            Some(2_700_000)
        );
    }

    #[test]
    fn test_splice_insert_builder_with_pts() {
        let splice_insert = SpliceInsertBuilder::new(67890)
            .at_pts(Duration::from_secs(20))
            .duration(Duration::from_secs(15))
            .auto_return(false)
            .build()
            .unwrap();

        assert!(!splice_insert.splice_immediate_flag);
        let splice_time = splice_insert.splice_time.unwrap();
        assert!(splice_time.time_specified_flag());
        assert_eq!(splice_time.pts_time, Some(Pts::new(20 * 90_000)));
        assert!(!splice_insert.break_duration.unwrap().auto_return);
    }

    #[test]
    fn test_splice_insert_builder_requires_time() {
        assert_eq!(
            SpliceInsertBuilder::new(1).build(),
            Err(BuilderError::MissingRequiredField("splice_time"))
        );
    }

    #[test]
    fn test_splice_insert_builder_cancellation() {
        let splice_insert = SpliceInsertBuilder::new(12345)
            .at_pts(Duration::from_secs(1))
            .cancel_event()
            .build()
            .unwrap();

        assert_eq!(splice_insert.splice_event_id, 12345);
        assert!(splice_insert.splice_event_cancel_indicator);
        assert_eq!(splice_insert.splice_time, None);
    }

    #[test]
    fn test_splice_insert_builder_component_splice() {
        let components = vec![
            (0x01, Some(Duration::from_secs(10))),
            (0x02, Some(Duration::from_secs(10))),
        ];

        let splice_insert = SpliceInsertBuilder::new(3333)
            .component_splice(components)
            .unwrap()
            .build()
            .unwrap();

        assert!(!splice_insert.program_splice_flag);
        assert_eq!(splice_insert.splice_time, None);
        assert_eq!(splice_insert.components.len(), 2);
        assert_eq!(splice_insert.components[0].component_tag, 0x01);
        assert_eq!(
            splice_insert.components[1].splice_time.and_then(|time| time.pts_time),
            Some(Pts::new(900_000))
        );
    }

    #[test]
    fn test_splice_insert_builder_component_without_time() {
        let result = SpliceInsertBuilder::new(3333)
            .component_splice(vec![(0x01, None)])
            .unwrap()
            .build();
        assert_eq!(
            result,
            Err(BuilderError::MissingRequiredField("component_splice_time"))
        );
    }

    #[test]
    fn test_splice_insert_builder_too_many_components() {
        let components: Vec<_> = (0..=255).map(|i| (i as u8, None)).collect();

        match SpliceInsertBuilder::new(1234).component_splice(components) {
            Err(BuilderError::InvalidComponentCount { max, actual }) => {
                assert_eq!(max, 255);
                assert_eq!(actual, 256);
            }
            other => panic!("Expected InvalidComponentCount error, got {other:?}"),
        }
    }

    #[test]
    fn test_time_signal_builder() {
        let immediate = TimeSignalBuilder::new().immediate().build().unwrap();
        assert!(!immediate.splice_time.time_specified_flag());

        let timed = TimeSignalBuilder::new()
            .at_pts(Duration::from_secs(30))
            .build()
            .unwrap();
        assert_eq!(timed.splice_time.pts_time, Some(Pts::new(2_700_000)));

        let too_late = TimeSignalBuilder::new()
            .at_pts(Duration::from_secs(100_000))
            .build();
        assert!(matches!(
            too_late,
            Err(BuilderError::DurationTooLarge { field: "pts_time", .. })
        ));
    }

    #[test]
    fn test_splice_time_and_break_duration_builders() {
        let splice_time = SpliceTimeBuilder::new()
            .at_pts(Duration::from_secs(2))
            .build()
            .unwrap();
        assert_eq!(splice_time.pts_time, Some(Pts::new(180_000)));
        assert!(!SpliceTimeBuilder::new().build().unwrap().time_specified_flag());

        let break_duration = BreakDurationBuilder::new(Duration::from_secs(60)).build().unwrap();
        assert!(break_duration.auto_return);
        assert_eq!(break_duration.duration, 5_400_000);
    }
}

mod descriptor_tests {
    use super::*;

    #[test]
    fn test_segmentation_descriptor_defaults() {
        let descriptor = SegmentationDescriptorBuilder::new(0x1234, SegmentationType::ProgramStart)
            .build()
            .unwrap();

        assert_eq!(descriptor.segmentation_event_id(), 0x1234);
        assert!(descriptor.program_segmentation_flag());
        assert!(descriptor.delivery_not_restricted_flag());
        assert_eq!(descriptor.segmentation_upid_type(), SegmentationUpidType::NotUsed);
        assert_eq!(descriptor.segment_num(), 1);
        assert_eq!(descriptor.segments_expected(), 1);
        assert_eq!(descriptor.pts(), None);
    }

    #[test]
    fn test_segmentation_descriptor_restrictions_and_duration() {
        let descriptor = SegmentationDescriptorBuilder::new(7, SegmentationType::ProviderAdvertisementStart)
            .delivery_restrictions(DeliveryRestrictions {
                web_delivery_allowed: false,
                no_regional_blackout: true,
                archive_allowed: true,
                device_restrictions: DeviceRestrictions::RestrictGroup1,
            })
            .duration(Duration::from_secs(15))
            .unwrap()
            .build()
            .unwrap();

        assert!(!descriptor.delivery_not_restricted_flag());
        assert_eq!(
            descriptor.delivery_restrictions().map(|r| r.device_restrictions),
            Some(DeviceRestrictions::RestrictGroup1)
        );
        assert_eq!(descriptor.segmentation_duration(), Some(1_350_000));
        assert_eq!(descriptor.duration(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_segmentation_duration_uses_40_bits() {
        // five days overflow 33 bits but not 40
        let five_days = Duration::from_secs(5 * 24 * 3600);
        let descriptor = SegmentationDescriptorBuilder::new(1, SegmentationType::ProgramStart)
            .duration(five_days)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(descriptor.segmentation_duration(), Some(5 * 24 * 3600 * 90_000));

        let too_long = SegmentationDescriptorBuilder::new(1, SegmentationType::ProgramStart)
            .duration(Duration::from_secs(20_000_000));
        assert!(matches!(
            too_long,
            Err(BuilderError::DurationTooLarge { field: "segmentation_duration", .. })
        ));
    }

    #[test]
    fn test_fixed_length_upid_validation() {
        let result = SegmentationDescriptorBuilder::new(1, SegmentationType::ProgramStart)
            .upid(Upid::new(SegmentationUpidType::AdID, "SHORT"));
        assert!(matches!(
            result,
            Err(BuilderError::InvalidUpidLength { expected: 12, actual: 5 })
        ));

        let descriptor = SegmentationDescriptorBuilder::new(1, SegmentationType::ProgramStart)
            .upid(Upid::new(SegmentationUpidType::AdID, "ABCD01234567"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(descriptor.segmentation_upid().to_string(), "\"ABCD01234567\"");
    }

    #[test]
    fn test_variable_length_upid_limit() {
        let result = SegmentationDescriptorBuilder::new(1, SegmentationType::ProgramStart)
            .upid(Upid::new(SegmentationUpidType::URI, vec![b'a'; 256]));
        assert!(matches!(
            result,
            Err(BuilderError::InvalidValue { field: "segmentation_upid", .. })
        ));
    }

    #[test]
    fn test_mid_upid() {
        let descriptor = SegmentationDescriptorBuilder::new(9, SegmentationType::UnscheduledEventStart)
            .mid(vec![
                Upid::new(SegmentationUpidType::ADI, "BLACKOUT:123"),
                Upid::new(SegmentationUpidType::AdID, "comcast:linear:licenserotation"),
            ])
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(descriptor.segmentation_upid_type(), SegmentationUpidType::MID);
        assert_eq!(descriptor.segmentation_upid().upids().len(), 2);
        assert_eq!(descriptor.stream_switch_signal_id(), Some("BLACKOUT:123".to_string()));
    }

    #[test]
    fn test_mid_rejected_as_single_upid() {
        let result = SegmentationDescriptorBuilder::new(9, SegmentationType::ProgramStart)
            .upid(Upid::new(SegmentationUpidType::MID, vec![]));
        assert!(matches!(result, Err(BuilderError::InvalidValue { .. })));
    }

    #[test]
    fn test_sub_segments_only_on_placement_opportunities() {
        let descriptor = SegmentationDescriptorBuilder::new(
            1,
            SegmentationType::ProviderPlacementOpportunityStart,
        )
        .sub_segment(1, 3)
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(descriptor.sub_segment_num(), Some(1));
        assert_eq!(descriptor.sub_segments_expected(), Some(3));
        assert!(!descriptor.is_terminal_sub_segment());

        let result = SegmentationDescriptorBuilder::new(1, SegmentationType::ChapterStart).sub_segment(1, 3);
        assert!(matches!(
            result,
            Err(BuilderError::InvalidValue { field: "sub_segment_num", .. })
        ));
    }

    #[test]
    fn test_component_segmentation() {
        let descriptor = SegmentationDescriptorBuilder::new(1, SegmentationType::ChapterStart)
            .component_segmentation(vec![Component {
                component_tag: 0x21,
                pts_offset: 90_000,
            }])
            .unwrap()
            .build()
            .unwrap();
        assert!(!descriptor.program_segmentation_flag());
        assert_eq!(descriptor.components().len(), 1);

        let result = SegmentationDescriptorBuilder::new(1, SegmentationType::ChapterStart)
            .component_segmentation(vec![Component {
                component_tag: 0x21,
                pts_offset: 1 << 33,
            }]);
        assert!(matches!(result, Err(BuilderError::InvalidValue { field: "pts_offset", .. })));
    }

    #[test]
    fn test_cancelled_descriptor() {
        let descriptor = SegmentationDescriptorBuilder::new(0x55, SegmentationType::ProgramStart)
            .segment(3, 4)
            .cancel_event()
            .build()
            .unwrap();

        assert!(descriptor.segmentation_event_cancel_indicator());
        assert_eq!(descriptor.segmentation_event_id(), 0x55);
        assert_eq!(descriptor.segmentation_type(), SegmentationType::NotIndicated);
    }
}

mod section_tests {
    use super::*;

    #[test]
    fn test_default_section_is_splice_null() {
        let section = SpliceInfoSectionBuilder::new().build().unwrap();
        assert_eq!(section.splice_command(), &SpliceCommand::SpliceNull);
        assert_eq!(section.tier(), 0xFFF);
        assert_eq!(section.pts(), None);
    }

    #[test]
    fn test_section_validation() {
        assert!(matches!(
            SpliceInfoSectionBuilder::new().tier(0x1000).build(),
            Err(BuilderError::InvalidValue { field: "tier", .. })
        ));
        assert!(matches!(
            SpliceInfoSectionBuilder::new().pts_adjustment(1 << 33).build(),
            Err(BuilderError::InvalidValue { field: "pts_adjustment", .. })
        ));
    }

    #[test]
    fn test_section_stamps_adjusted_pts() {
        let section = SpliceInfoSectionBuilder::new()
            .pts_adjustment(100)
            .time_signal(TimeSignalBuilder::new().at(Pts::new(crate::pts::MAX_PTS)).build().unwrap())
            .add_segmentation_descriptor(
                SegmentationDescriptorBuilder::new(1, SegmentationType::ChapterStart)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        // wraps past 2^33
        assert_eq!(section.pts(), Some(Pts::new(99)));
        assert_eq!(
            section.segmentation_descriptors().next().and_then(|d| d.pts()),
            Some(Pts::new(99))
        );
    }

    #[test]
    fn test_built_splice_insert_round_trips() {
        let section = SpliceInfoSectionBuilder::new()
            .splice_insert(
                SpliceInsertBuilder::new(0x4800_008f)
                    .at(Pts::new(0x0_7369_c02e))
                    .duration(Duration::from_secs(60))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let bytes = section.serialize().unwrap();
        let parsed = parse_splice_info_section(&bytes).unwrap();
        assert_eq!(parsed, section);
        assert_eq!(parsed.pts(), Some(Pts::new(0x0_7369_c02e)));
    }

    #[test]
    fn test_section_rejects_splice_insert_fields_left_off_the_wire() {
        let scheduled = SpliceInsertBuilder::new(7).at(Pts::new(90_000)).build().unwrap();
        let build = |insert: SpliceInsert| SpliceInfoSectionBuilder::new().splice_insert(insert).build();

        let immediate_with_time = SpliceInsert {
            splice_immediate_flag: true,
            ..scheduled.clone()
        };
        assert!(matches!(
            build(immediate_with_time),
            Err(BuilderError::InvalidValue { field: "splice_time", .. })
        ));

        let scheduled_without_time = SpliceInsert {
            splice_time: None,
            ..scheduled.clone()
        };
        assert!(matches!(
            build(scheduled_without_time),
            Err(BuilderError::InvalidValue { field: "splice_time", .. })
        ));

        let component_with_program_time = SpliceInsert {
            program_splice_flag: false,
            components: vec![SpliceInsertComponent {
                component_tag: 1,
                splice_time: Some(SpliceTime::new(Pts::new(90_000))),
            }],
            ..scheduled.clone()
        };
        assert!(matches!(
            build(component_with_program_time),
            Err(BuilderError::InvalidValue { field: "splice_time", .. })
        ));

        let immediate_component_with_time = SpliceInsert {
            program_splice_flag: false,
            splice_immediate_flag: true,
            splice_time: None,
            components: vec![SpliceInsertComponent {
                component_tag: 1,
                splice_time: Some(SpliceTime::new(Pts::new(90_000))),
            }],
            ..scheduled.clone()
        };
        assert!(matches!(
            build(immediate_component_with_time),
            Err(BuilderError::InvalidValue { field: "components", .. })
        ));

        let cancelled_with_time = SpliceInsert {
            splice_event_cancel_indicator: true,
            ..scheduled.clone()
        };
        assert!(matches!(
            build(cancelled_with_time),
            Err(BuilderError::InvalidValue { field: "splice_event_cancel_indicator", .. })
        ));

        assert!(build(scheduled).is_ok());
    }

    #[test]
    fn test_built_immediate_splice_insert_keeps_pts_through_round_trip() {
        let section = SpliceInfoSectionBuilder::new()
            .splice_insert(SpliceInsertBuilder::new(0x10).immediate().build().unwrap())
            .add_segmentation_descriptor(
                SegmentationDescriptorBuilder::new(0x10, SegmentationType::BreakStart)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        assert_eq!(section.pts(), None);

        let parsed = parse_splice_info_section(&section.serialize().unwrap()).unwrap();
        assert_eq!(parsed, section);
        assert_eq!(parsed.pts(), section.pts());
        assert_eq!(
            parsed.segmentation_descriptors().next().and_then(|d| d.pts()),
            section.segmentation_descriptors().next().and_then(|d| d.pts())
        );
    }

    #[test]
    fn test_segmentation_duration_rejects_huge_duration() {
        let result = SegmentationDescriptorBuilder::new(1, SegmentationType::BreakStart).duration(Duration::MAX);
        assert!(matches!(
            result,
            Err(BuilderError::DurationTooLarge { field: "segmentation_duration", .. })
        ));

        let result = SpliceInsertBuilder::new(1).at_pts(Duration::MAX).build();
        assert!(matches!(result, Err(BuilderError::DurationTooLarge { field: "splice_time", .. })));
    }

    #[test]
    fn test_built_time_signal_with_mid_round_trips() {
        let descriptor = SegmentationDescriptorBuilder::new(
            0x4800_008e,
            SegmentationType::ProviderPlacementOpportunityStart,
        )
        .duration(Duration::from_secs(30))
        .unwrap()
        .mid(vec![
            Upid::new(SegmentationUpidType::AiringID, 0x2ca0_a18a_u64.to_be_bytes()),
            Upid::new(SegmentationUpidType::URI, "urn:example:break"),
        ])
        .unwrap()
        .sub_segment(1, 2)
        .unwrap()
        .build()
        .unwrap();

        let section = SpliceInfoSectionBuilder::new()
            .time_signal(TimeSignalBuilder::new().at(Pts::new(0x0_7462_90a0)).build().unwrap())
            .add_segmentation_descriptor(descriptor)
            .build()
            .unwrap();

        let parsed = parse_splice_info_section(&section.serialize().unwrap()).unwrap();
        assert_eq!(parsed, section);

        let descriptor = parsed.segmentation_descriptors().next().unwrap();
        assert!(matches!(descriptor.segmentation_upid(), SegmentationUpid::Mid(upids) if upids.len() == 2));
        assert_eq!(descriptor.sub_segment_num(), Some(1));
    }
}
