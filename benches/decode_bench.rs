//! Benchmarks the decode loop over graphs of increasing fan-out, to
//! track the cost of the cutoff engine and token-map churn as the
//! frontier grows.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use wfst_decoder::fst::memory::VectorFst;
use wfst_decoder::fst::Arc as FstArc;
use wfst_decoder::scorer::MockScorer;
use wfst_decoder::{Decoder, DecoderConfig};

fn fanout_graph(width: usize) -> VectorFst {
    let mut fst = VectorFst::new();
    let start = fst.add_state();
    fst.set_start(start);
    for i in 0..width {
        let end = fst.add_state();
        fst.set_final(end, 0.0);
        fst.add_arc(start, FstArc::new((i + 1) as i32, (i + 1) as i32, i as f32 * 0.01, end));
    }
    fst
}

fn scripted_scorer(vocab: usize) -> MockScorer {
    let mut row0 = vec![0.0f32; vocab + 1];
    row0[vocab] = -10.0; // keep eos off the argmax on step 0
    let mut row1 = vec![-10.0f32; vocab + 1];
    row1[vocab] = 0.0; // eos wins on step 1
    MockScorer::new(vec![row0, row1])
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_fanout");
    for width in [10usize, 100, 500] {
        let fst = fanout_graph(width);
        let scorer = scripted_scorer(width);
        let config = DecoderConfig {
            sos: 0,
            eos: width as i32,
            max_active: 50,
            ..Default::default()
        };

        group.bench_function(format!("width_{width}"), |b| {
            b.iter(|| {
                let mut decoder = Decoder::new(&fst, scorer.clone(), config.clone());
                black_box(decoder.decode(&(), 0, || false).unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
