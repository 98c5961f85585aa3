//! A simple vocabulary example.
//!
//! In this example, several threads each scan a share of a text, and record the first line at which every word
//! appears. As `insert` never overwrites, the first thread to see a word wins; whichever thread it is, the resulting
//! vocabulary is the same.

use stripemap::hashmap::StripedHashMap;

const TEXT: &str = "\
the quick brown fox jumps over the lazy dog
the dog sleeps while the fox runs
a lazy afternoon for a quick fox
brown leaves over a sleeping dog";

const NUMBER_THREADS: usize = 2;

fn main() {
    let lines: Vec<_> = TEXT.lines().enumerate().collect();
    let vocabulary: StripedHashMap<&str, usize> = StripedHashMap::new();

    crossbeam_utils::thread::scope(|scope| {
        for share in lines.chunks(lines.len().div_ceil(NUMBER_THREADS)) {
            let vocabulary = &vocabulary;

            scope.spawn(move |_| {
                let mut new = 0;

                for &(number, line) in share {
                    new += vocabulary.extend(line.split_whitespace().map(|word| (word, number)));
                }

                println!("Thread saw {} new words", new);
            });
        }
    })
    .unwrap();

    println!("Vocabulary: {:?}", vocabulary);

    assert_eq!(16, vocabulary.len());
    assert!(vocabulary.contains_key(&"fox"));

    let (found, _) = vocabulary.find(&"cat");
    assert!(!found);
}
