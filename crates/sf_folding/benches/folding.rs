use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;

use sf_folding::EnergyModel;
use sf_folding::NucleotideVec;
use sf_folding::PairingRules;
use sf_folding::StackingFold;
use sf_folding::UnitaryFold;

pub fn folding(c: &mut Criterion) {
    let mut group = c.benchmark_group("Folding");

    let seq = NucleotideVec::try_from(
        "GGGAGGGCCCUCUCCCGGGAAAUUUACCCGGGUUAAGGGAUUUACCCGGGUUGAGCUCCCCGGGGUGCAC",
    )
    .unwrap();

    group.bench_function("Unitary fill and optimal backtrack.", |b| {
        b.iter(|| {
            let fold = UnitaryFold::new(&seq, EnergyModel::Unitary, PairingRules::Nussinov);
            let _ = fold.backtrack_optimal();
        });
    });

    group.bench_function("Stacking fill and delta-0 enumeration.", |b| {
        b.iter(|| {
            let fold = StackingFold::new(&seq, PairingRules::Nussinov);
            let _ = fold.backtrack_within(0);
        });
    });
}

criterion_group!(benches, folding);
criterion_main!(benches);
