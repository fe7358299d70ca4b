// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Performance Benchmarks for Crypto and Backup Operations
//!
//! Run with: cargo bench -p mbhd-core

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

// =============================================================================
// STORE ENCRYPTION BENCHMARKS
// =============================================================================

fn bench_store_encryption(c: &mut Criterion) {
    use mbhd_core::crypto::{decrypt, encrypt, SymmetricKey};

    let key = SymmetricKey::generate();

    let mut group = c.benchmark_group("store_encryption");

    // Single payment request
    let small_msg = vec![b'x'; 512];
    group.throughput(Throughput::Bytes(512));
    group.bench_function("encrypt_small_512B", |b| {
        b.iter(|| encrypt(black_box(&key), black_box(&small_msg)))
    });

    // Typical payments database
    let large_msg = vec![b'x'; 256 * 1024];
    group.throughput(Throughput::Bytes(256 * 1024));
    group.bench_function("encrypt_large_256KB", |b| {
        b.iter(|| encrypt(black_box(&key), black_box(&large_msg)))
    });

    let ciphertext = encrypt(&key, &large_msg).unwrap();
    group.bench_function("decrypt_large_256KB", |b| {
        b.iter(|| decrypt(black_box(&key), black_box(&ciphertext)))
    });

    group.finish();
}

// =============================================================================
// KEY WRAPPING BENCHMARKS
// =============================================================================

fn bench_key_wrapping(c: &mut Criterion) {
    use mbhd_core::crypto::{pad_secret, wrap, wrap_verified, SymmetricKey, WRAP_IV};

    let key = SymmetricKey::generate();
    let backup_key = SymmetricKey::generate();

    let mut group = c.benchmark_group("key_wrapping");

    group.bench_function("pad_password", |b| {
        b.iter(|| pad_secret(black_box(b"correct horse battery staple")))
    });

    group.bench_function("wrap_backup_key", |b| {
        b.iter(|| wrap(black_box(backup_key.as_bytes()), black_box(&key), &WRAP_IV))
    });

    group.bench_function("wrap_verified_backup_key", |b| {
        b.iter(|| wrap_verified(black_box(backup_key.as_bytes()), black_box(&key)))
    });

    group.finish();
}

// =============================================================================
// KEY DERIVATION BENCHMARKS
// =============================================================================

fn bench_scrypt(c: &mut Criterion) {
    use mbhd_core::crypto::{derive_password_key, KdfParams};

    let mut group = c.benchmark_group("scrypt");
    // Production cost is deliberately slow
    group.sample_size(10);

    let production = KdfParams::default();
    group.bench_function("derive_password_key_n14", |b| {
        b.iter(|| derive_password_key(black_box("correct horse"), &production))
    });

    let fast = KdfParams::insecure_fast();
    group.bench_function("derive_password_key_n4", |b| {
        b.iter(|| derive_password_key(black_box("correct horse"), &fast))
    });

    group.finish();
}

// =============================================================================
// SECURE DELETE BENCHMARKS
// =============================================================================

fn bench_secure_delete(c: &mut Criterion) {
    use mbhd_core::storage::secure_delete;
    use tempfile::TempDir;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("victim.wallet");
    let contents = vec![0x42u8; 1024 * 1024];

    let mut group = c.benchmark_group("secure_delete");
    group.throughput(Throughput::Bytes(contents.len() as u64));
    group.bench_function("secure_delete_1MB", |b| {
        b.iter(|| {
            std::fs::write(&path, &contents).unwrap();
            secure_delete(black_box(&path)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_store_encryption,
    bench_key_wrapping,
    bench_scrypt,
    bench_secure_delete,
);

criterion_main!(benches);
