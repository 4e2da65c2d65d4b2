//! # evd-mock: Synthetic Evidence
//!
//! Produces seeded, reproducible evidence records so the service and CLI have
//! data without a backing store. The same [`MockConfig`] always yields the
//! same records, custody event ids included.
//!
//! Content hashes are real: each record's `HashRecord` is the SHA-256 of
//! [`synthetic_content`] for that record, so integrity verification against
//! mock data behaves like it would against real uploads.

use evd_core::{
    CustodyEventType, EntityLink, EvidenceId, EvidenceItem, EvidenceStatus, EvidenceType,
    FileMetadata, HashRecord, LinkEntityType, Location, Review, ReviewDecision, Scope,
    Sensitivity, Timestamp,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// 2026-01-01T00:00:00Z.
pub const DEFAULT_BASE_EPOCH: i64 = 1_767_225_600;
pub const DEFAULT_SEED: u64 = 20_260_101;
pub const DEFAULT_COUNT: usize = 60;

/// A province with its districts, each district with its wards.
pub struct ProvinceData {
    pub name: &'static str,
    pub districts: &'static [(&'static str, &'static [&'static str])],
}

pub const PROVINCES: &[ProvinceData] = &[
    ProvinceData {
        name: "Hà Nội",
        districts: &[
            ("Ba Đình", &["Phúc Xá", "Trúc Bạch", "Kim Mã"]),
            ("Hoàn Kiếm", &["Hàng Bạc", "Tràng Tiền"]),
            ("Đống Đa", &["Văn Miếu", "Láng Thượng"]),
            ("Hai Bà Trưng", &["Bạch Đằng", "Lê Đại Hành"]),
            ("Cầu Giấy", &["Dịch Vọng", "Nghĩa Đô"]),
        ],
    },
    ProvinceData {
        name: "TP. Hồ Chí Minh",
        districts: &[
            ("Quận 1", &["Bến Nghé", "Bến Thành"]),
            ("Quận 3", &["Võ Thị Sáu"]),
            ("Bình Thạnh", &["Phường 25", "Phường 26"]),
        ],
    },
    ProvinceData {
        name: "Đà Nẵng",
        districts: &[("Hải Châu", &["Thạch Thang"]), ("Thanh Khê", &["Tân Chính"])],
    },
    ProvinceData {
        name: "Thừa Thiên Huế",
        districts: &[("Thành phố Huế", &["Phú Hội", "Vĩnh Ninh"])],
    },
    ProvinceData {
        name: "Cần Thơ",
        districts: &[("Ninh Kiều", &["An Hòa", "Tân An"])],
    },
];

pub const SUBMITTERS: &[&str] = &[
    "Nguyễn Văn An",
    "Trần Thị Bình",
    "Lê Hoàng Cường",
    "Phạm Thu Dung",
    "Hoàng Minh Đức",
    "Vũ Thị Hà",
    "Đặng Quốc Huy",
];

pub const REVIEWERS: &[&str] = &[
    "Bùi Thanh Lâm",
    "Đỗ Thị Mai",
    "Ngô Văn Nam",
    "Trịnh Thị Oanh",
];

const TAGS: &[&str] = &[
    "hàng giả",
    "nhãn mác",
    "an toàn thực phẩm",
    "giá cả",
    "kiểm tra định kỳ",
    "khiếu nại",
];

const STREETS: &[&str] = &["Phố Huế", "Lê Lợi", "Trần Phú", "Nguyễn Trãi"];

const DEVICES: &[&str] = &["Android 14 / Camera", "iOS 17 / Safari", "Windows 11 / Chrome"];

/// Generator parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockConfig {
    pub count: usize,
    pub seed: u64,
    pub base_epoch: i64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            seed: DEFAULT_SEED,
            base_epoch: DEFAULT_BASE_EPOCH,
        }
    }
}

impl MockConfig {
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }
}

/// Bytes standing in for the uploaded file of `id`.
pub fn synthetic_content(id: &EvidenceId, file_name: &str) -> Vec<u8> {
    format!("evidence:{id}:{file_name}").into_bytes()
}

/// Generate `config.count` records.
pub fn generate(config: &MockConfig) -> Vec<EvidenceItem> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let items: Vec<EvidenceItem> = (0..config.count)
        .map(|i| generate_one(&mut rng, config, i))
        .collect();
    tracing::debug!(count = items.len(), seed = config.seed, "generated mock evidence");
    items
}

fn pick<'a, T>(rng: &mut StdRng, values: &'a [T]) -> &'a T {
    // Every table in this module is non-empty.
    &values[rng.gen_range(0..values.len())]
}

fn file_for(evidence_type: EvidenceType, n: usize) -> (String, &'static str) {
    match evidence_type {
        EvidenceType::Photo => (format!("IMG_{n:04}.jpg"), "image/jpeg"),
        EvidenceType::Video => (format!("VID_{n:04}.mp4"), "video/mp4"),
        EvidenceType::Audio => (format!("REC_{n:04}.m4a"), "audio/mp4"),
        EvidenceType::Doc => (
            format!("bien-ban-{n:04}.docx"),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ),
        EvidenceType::Pdf => (format!("quyet-dinh-{n:04}.pdf"), "application/pdf"),
        EvidenceType::Other => (format!("du-lieu-{n:04}.zip"), "application/zip"),
    }
}

fn status_for(rng: &mut StdRng) -> EvidenceStatus {
    // Weighted towards the review queue so the queue is never empty.
    let weights: [(EvidenceStatus, u32); 7] = [
        (EvidenceStatus::Draft, 2),
        (EvidenceStatus::Submitted, 4),
        (EvidenceStatus::InReview, 3),
        (EvidenceStatus::NeedMoreInfo, 2),
        (EvidenceStatus::Approved, 3),
        (EvidenceStatus::Rejected, 1),
        (EvidenceStatus::Sealed, 1),
    ];
    weights
        .choose_weighted(rng, |(_, w)| *w)
        .map(|(s, _)| *s)
        .unwrap_or(EvidenceStatus::Submitted)
}

fn sensitivity_for(rng: &mut StdRng) -> Sensitivity {
    match rng.gen_range(0..10) {
        0..=2 => Sensitivity::Public,
        3..=6 => Sensitivity::Internal,
        7..=8 => Sensitivity::Restricted,
        _ => Sensitivity::SecretLite,
    }
}

fn seeded_uuid(rng: &mut StdRng) -> uuid::Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// Append a custody event with a seeded id, IP and device.
fn log(
    item: &mut EvidenceItem,
    rng: &mut StdRng,
    actor: &str,
    kind: CustodyEventType,
    action: String,
    at: Timestamp,
) {
    item.log_custody(actor, kind, action, at);
    let id = seeded_uuid(rng);
    let ip = format!(
        "10.{}.{}.{}",
        rng.gen_range(0..=20),
        rng.gen_range(0..=255),
        rng.gen_range(1..=254)
    );
    let device = *pick(rng, DEVICES);
    if let Some(event) = item.custody.last_mut() {
        event.id = id;
        event.ip = Some(ip);
        event.device = Some(device.to_string());
    }
}

fn generate_one(rng: &mut StdRng, config: &MockConfig, index: usize) -> EvidenceItem {
    let seq = index as u64 + 1;
    let uploaded_secs = config.base_epoch + index as i64 * 5_400 + rng.gen_range(0..3_600);
    let uploaded_at = Timestamp::from_epoch_secs(uploaded_secs).unwrap_or_else(|_| Timestamp::now());
    let id = EvidenceId::generate(uploaded_at.year(), seq);

    let evidence_type = *pick(rng, &EvidenceType::ALL);
    let (name, mime) = file_for(evidence_type, index + 1);

    let province = pick(rng, PROVINCES);
    let district_index = rng.gen_range(0..province.districts.len());
    let (district, wards) = province.districts[district_index];
    let ward = *pick(rng, wards);
    let scope = Scope {
        province: province.name.to_string(),
        district: Some(district.to_string()),
        ward: Some(ward.to_string()),
        unit: Some(format!("Đội {}", district_index + 1)),
    };

    let submitter = *pick(rng, SUBMITTERS);
    let file = FileMetadata {
        name: name.clone(),
        mime_type: mime.to_string(),
        size_bytes: rng.gen_range(20_000..25_000_000),
    };
    let mut item = EvidenceItem::new(
        id.clone(),
        evidence_type,
        file,
        scope,
        submitter,
        uploaded_at,
    );
    item.sensitivity = sensitivity_for(rng);
    item.status = status_for(rng);
    if rng.gen_bool(0.7) {
        item.captured_at = Some(uploaded_at.offset_secs(-rng.gen_range(600..172_800)));
    }
    let house = rng.gen_range(1..300);
    let street = *pick(rng, STREETS);
    item.location = Some(Location {
        address: format!("{house} {street}, {ward}, {district}"),
        latitude: Some(f64::from(rng.gen_range(8_500u32..23_000)) / 1_000.0),
        longitude: Some(f64::from(rng.gen_range(102_000u32..109_500)) / 1_000.0),
    });

    let content = synthetic_content(&id, &name);
    item.hashes.push(HashRecord {
        digest: evd_core::sha256_content(&content),
        computed_at: uploaded_at,
        computed_by: "system".to_string(),
    });

    for _ in 0..rng.gen_range(0..=2) {
        let entity_type = *pick(rng, &LinkEntityType::ALL);
        let entity_id = format!(
            "{}-{:04}",
            entity_type.as_str().to_uppercase(),
            rng.gen_range(1..500)
        );
        item.links.push(EntityLink {
            entity_type,
            label: Some(format!("{} {entity_id}", entity_type.as_str())),
            entity_id,
        });
    }
    let tag_count = rng.gen_range(0..=2);
    let mut tags: Vec<String> = TAGS
        .choose_multiple(rng, tag_count)
        .map(|t| t.to_string())
        .collect();
    tags.sort();
    item.tags = tags;
    if rng.gen_bool(0.3) {
        item.notes = Some(format!("Ghi chú hiện trường #{seq}"));
    }

    log(
        &mut item,
        rng,
        submitter,
        CustodyEventType::Upload,
        format!("Uploaded {name}"),
        uploaded_at,
    );
    let mut at = uploaded_at;
    if rng.gen_bool(0.5) {
        at = at.offset_secs(rng.gen_range(60..7_200));
        let viewer = *pick(rng, REVIEWERS);
        log(
            &mut item,
            rng,
            viewer,
            CustodyEventType::View,
            "Viewed evidence".to_string(),
            at,
        );
    }

    if !matches!(item.status, EvidenceStatus::Draft | EvidenceStatus::Submitted) {
        let reviewer = *pick(rng, REVIEWERS);
        at = at.offset_secs(rng.gen_range(600..86_400));
        item.review = Review {
            assigned_reviewer: Some(reviewer.to_string()),
            ..Review::default()
        };
        log(
            &mut item,
            rng,
            reviewer,
            CustodyEventType::Review,
            format!("Assigned to {reviewer}"),
            at,
        );

        let decision = match item.status {
            EvidenceStatus::Approved | EvidenceStatus::Sealed => Some(ReviewDecision::Approve),
            EvidenceStatus::Rejected => Some(ReviewDecision::Reject),
            EvidenceStatus::NeedMoreInfo => Some(ReviewDecision::NeedMoreInfo),
            _ => None,
        };
        if let Some(decision) = decision {
            at = at.offset_secs(rng.gen_range(600..86_400));
            item.review.decision = Some(decision);
            item.review.reviewed_at = Some(at);
            item.review.comment = Some(match decision {
                ReviewDecision::Approve => "Đủ điều kiện".to_string(),
                ReviewDecision::Reject => "Không hợp lệ".to_string(),
                ReviewDecision::NeedMoreInfo => "Cần bổ sung thông tin".to_string(),
            });
            log(
                &mut item,
                rng,
                reviewer,
                decision.custody_event(),
                format!("Decision: {decision:?}"),
                at,
            );
        }
        if item.status == EvidenceStatus::Sealed {
            at = at.offset_secs(rng.gen_range(600..86_400));
            log(
                &mut item,
                rng,
                reviewer,
                CustodyEventType::Seal,
                "Sealed".to_string(),
                at,
            );
        }
    }
    item
}
