use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use strephit::extraction::{extract_sentences, CorpusItem, ExtractorSettings, LemmaTokens, Toolkit};
use strephit::nlp::{LexiconTagger, UnicodeSplitter};
use strephit::ranking::{PopularityRanking, TfIdfMatrix, TfIdfRanking};

const NB_ITEMS: usize = 1_000;
const BIO: &str = "She was born in Rome in 1900. She married a painter and wrote three novels. \
                   She lived in Paris until 1940, then moved to Lisbon. She died in 1950.";

fn corpus() -> Vec<CorpusItem> {
    (0..NB_ITEMS)
        .map(|i| {
            serde_json::from_value(json!({
                "name": format!("person {}", i),
                "url": format!("http://example.org/{}", i),
                "bio": BIO,
            }))
            .unwrap()
        })
        .collect()
}

fn lemma_tokens() -> LemmaTokens {
    serde_json::from_value(json!({
        "bear": ["born"],
        "die": ["died"],
        "live": ["lived"],
        "marry": ["married"],
        "move": ["moved"],
        "write": ["wrote"],
    }))
    .unwrap()
}

fn toolkit() -> Toolkit {
    let mut tagger = LexiconTagger::default();
    for (token, lemma) in &[
        ("born", "bear"),
        ("died", "die"),
        ("lived", "live"),
        ("married", "marry"),
        ("moved", "move"),
        ("wrote", "write"),
    ] {
        tagger.insert(token, "VVD", lemma);
    }
    Toolkit::new(Box::new(UnicodeSplitter::new("en")), Box::new(tagger))
}

fn extract_all(corpus: Vec<CorpusItem>, strategy: &str, processes: usize) -> usize {
    extract_sentences(
        corpus,
        &ExtractorSettings::default(),
        lemma_tokens(),
        strategy,
        toolkit(),
        processes,
    )
    .unwrap()
    .count()
}

pub fn extraction_sequential(c: &mut Criterion) {
    let corpus = corpus();
    c.bench_function("extraction n2n processes=0", |b| {
        b.iter(|| black_box(extract_all(corpus.clone(), "n2n", 0)))
    });
    c.bench_function("extraction 121 processes=0", |b| {
        b.iter(|| black_box(extract_all(corpus.clone(), "121", 0)))
    });
}

pub fn extraction_parallel(c: &mut Criterion) {
    let corpus = corpus();
    c.bench_function("extraction n2n processes=4", |b| {
        b.iter(|| black_box(extract_all(corpus.clone(), "n2n", 4)))
    });
}

pub fn ranking(c: &mut Criterion) {
    let documents: Vec<String> = (0..NB_ITEMS).map(|_| BIO.to_string()).collect();
    let verbs = lemma_tokens();
    let matrix = TfIdfMatrix::fit(&documents).unwrap();

    c.bench_function("popularity ranking", |b| {
        b.iter(|| {
            black_box(
                PopularityRanking::new(&documents, &verbs)
                    .find_ranking(0, true)
                    .unwrap(),
            )
        })
    });
    c.bench_function("tf-idf ranking", |b| {
        b.iter(|| black_box(TfIdfRanking::new(&matrix, &verbs).find_ranking(0).unwrap()))
    });
}

criterion_group!(benches, extraction_sequential, extraction_parallel, ranking);
criterion_main!(benches);
