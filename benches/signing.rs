use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use paydia_snap::services::signer::{self, PrivateKeyMaterial};
use paydia_snap::utils::time::SnapTimestamp;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;

fn bench_signatures(c: &mut Criterion) {
    let key = RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("generate key");
    let pem = key.to_pkcs8_pem(LineEnding::LF).expect("encode key");
    let material = PrivateKeyMaterial::Pem(pem.as_str().to_string());
    let timestamp = SnapTimestamp::from_utc(Utc.with_ymd_and_hms(2025, 1, 1, 3, 0, 0).unwrap());
    let body = r#"{"merchantId":"M1","partnerReferenceNo":"INV-001","amount":{"value":"15000.00","currency":"IDR"},"validityPeriod":"2025-01-01T10:00:00+07:00"}"#;

    c.bench_function("asymmetric_signature", |b| {
        b.iter(|| signer::asymmetric_signature(black_box("client-1"), &timestamp, &material))
    });

    c.bench_function("symmetric_signature", |b| {
        b.iter(|| {
            signer::symmetric_signature(
                "POST",
                "/snap/v1.0/qr/qr-mpm-generate",
                black_box("tok-123"),
                black_box(body),
                &timestamp,
                "s3cret",
            )
        })
    });

    c.bench_function("create_external_id", |b| b.iter(signer::create_external_id));
}

criterion_group!(benches, bench_signatures);
criterion_main!(benches);
