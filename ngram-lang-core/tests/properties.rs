use ngram_lang_core::{Language, NGramTrie, rank, top_matches};
use proptest::prelude::*;

fn profile(max_depth: usize, documents: &[String]) -> Language {
	let mut language = Language::new(max_depth).unwrap();
	for document in documents {
		language.ingest_str(document);
	}
	language
}

proptest! {
	#[test]
	fn repeated_add_equals_counted_add(gram in "[a-d]{1,4}", k in 1u64..20) {
		let mut repeated = NGramTrie::new(4).unwrap();
		for _ in 0..k {
			repeated.add(&gram, 1);
		}
		let mut counted = NGramTrie::new(4).unwrap();
		counted.add(&gram, k);

		prop_assert_eq!(&repeated, &counted);
		prop_assert_eq!(repeated.frequencies(Some(gram.len())), counted.frequencies(Some(gram.len())));
	}

	#[test]
	fn depth_totals_match_stored_counts(grams in prop::collection::vec("[a-e]{1,6}", 0..30), max_depth in 1usize..5) {
		let mut trie = NGramTrie::new(max_depth).unwrap();
		for gram in &grams {
			trie.add(gram, 1);
		}
		for depth in 0..=max_depth {
			let summed: u64 = trie.counts_at(depth).iter().map(|(_, count)| count).sum();
			prop_assert_eq!(summed, trie.total(depth));
		}
	}

	#[test]
	fn frequencies_form_a_distribution(grams in prop::collection::vec("[a-e]{1,3}", 1..30)) {
		let mut trie = NGramTrie::new(3).unwrap();
		for gram in &grams {
			trie.add(gram, 1);
		}
		let root = trie.frequencies(Some(0));
		prop_assert_eq!(root.len(), 1);
		prop_assert!((root[""] - 1.0).abs() < 1e-12);

		for depth in 1..=3 {
			let frequencies = trie.frequencies(Some(depth));
			if trie.total(depth) == 0 {
				prop_assert!(frequencies.is_empty());
			} else {
				let sum: f64 = frequencies.values().sum();
				prop_assert!((sum - 1.0).abs() < 1e-9);
			}
		}
	}

	#[test]
	fn export_restores_the_same_trie(grams in prop::collection::vec("[a-e]{1,5}", 0..30)) {
		let mut trie = NGramTrie::new(3).unwrap();
		for gram in &grams {
			trie.add(gram, 1);
		}
		let restored = NGramTrie::from_counts(3, trie.export_counts()).unwrap();
		prop_assert_eq!(restored, trie);
	}

	#[test]
	fn predictions_never_fail(grams in prop::collection::vec("[a-c]{1,3}", 0..10), context in "\\PC{0,8}") {
		let mut trie = NGramTrie::new(3).unwrap();
		for gram in &grams {
			trie.add(gram, 1);
		}
		let likely = trie.next_most_likely(&context);
		let random = trie.next_random(&context);
		if trie.is_empty() {
			prop_assert_eq!(likely, None);
			prop_assert_eq!(random, None);
		} else {
			prop_assert!(random.is_some());
		}
	}

	#[test]
	fn compare_is_symmetric_and_bounded(
		a in prop::collection::vec("[a-f ,]{0,40}", 0..3),
		b in prop::collection::vec("[a-f ,]{0,40}", 0..3),
	) {
		let a = profile(3, &a);
		let b = profile(3, &b);
		let score = a.compare(&b);
		prop_assert_eq!(score, b.compare(&a));
		prop_assert!((0.0..=1.0).contains(&score));
	}

	#[test]
	fn compare_with_itself_is_one(documents in prop::collection::vec("[a-z ]{1,40}", 1..3)) {
		let language = profile(3, &documents);
		if !language.trie().frequencies(None).is_empty() {
			prop_assert!((language.compare(&language) - 1.0).abs() < 1e-9);
		}
	}

	#[test]
	fn top_matches_is_rank_prefix(
		texts in prop::collection::vec("[a-h ]{0,30}", 0..6),
		unknown in "[a-h ]{0,30}",
		limit in 0usize..8,
	) {
		let references: Vec<(String, Language)> = texts
			.iter()
			.enumerate()
			.map(|(i, text)| (format!("lang{i}"), profile(2, std::slice::from_ref(text))))
			.collect();
		let unknown = profile(2, &[unknown]);

		let all = rank(&unknown, references.iter().map(|(n, l)| (n.as_str(), l)));
		prop_assert!(all.windows(2).all(|pair| pair[0].score >= pair[1].score));

		let top = top_matches(&unknown, references.iter().map(|(n, l)| (n.as_str(), l)), Some(limit));
		prop_assert_eq!(top.len(), limit.min(references.len()));
		prop_assert_eq!(&top[..], &all[..top.len()]);
	}
}
