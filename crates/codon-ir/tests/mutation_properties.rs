use codon_ir::{
    compare_genomes, decode, deletion_mutation, frameshift_mutation, insertion_mutation,
    missense_mutation, nonsense_mutation, point_mutation, silent_mutation, tokenize, Codon,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn genome_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(0usize..64, 0..24).prop_map(|indices| {
        let body: Vec<String> = indices
            .into_iter()
            .filter_map(Codon::from_index)
            .map(|c| c.to_string())
            .collect();
        let mut parts = vec!["ATG".to_string()];
        parts.extend(body);
        parts.push("TAA".to_string());
        parts.join(" ")
    })
}

proptest! {
    #[test]
    fn decode_is_total_and_stable(index in 0usize..64) {
        let codon = Codon::from_index(index).unwrap();
        prop_assert_eq!(decode(codon), decode(codon));
    }

    #[test]
    fn substitutions_preserve_length(genome in genome_strategy(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for result in [
            silent_mutation(&genome, None, &mut rng),
            missense_mutation(&genome, None, &mut rng),
            nonsense_mutation(&genome, None, &mut rng),
            point_mutation(&genome, None, &mut rng),
        ]
        .into_iter()
        .flatten()
        {
            prop_assert_eq!(result.mutated.len(), genome.len());
            prop_assert!(tokenize(&result.mutated).is_ok());
        }
    }

    #[test]
    fn silent_mutation_keeps_opcode(genome in genome_strategy(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        if let Ok(result) = silent_mutation(&genome, None, &mut rng) {
            let before = tokenize(&genome).unwrap();
            let after = tokenize(&result.mutated).unwrap();
            let i = result.position;
            prop_assert_ne!(before[i].codon, after[i].codon);
            prop_assert_eq!(decode(before[i].codon), decode(after[i].codon));
        }
    }

    #[test]
    fn insertion_adds_exact_count(genome in genome_strategy(), count in 1usize..8, seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = insertion_mutation(&genome, None, count, &mut rng).unwrap();
        prop_assert_eq!(result.mutated.len(), genome.len() + count);
    }

    #[test]
    fn deletion_removes_exact_count(genome in genome_strategy(), count in 1usize..6, seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = deletion_mutation(&genome, None, count, &mut rng).unwrap();
        prop_assert_eq!(result.mutated.len(), genome.len() - count);
    }

    #[test]
    fn frameshift_breaks_frame(genome in genome_strategy(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = frameshift_mutation(&genome, None, &mut rng).unwrap();
        let delta = (result.mutated.len() as i64 - genome.len() as i64).abs();
        prop_assert!(delta == 1 || delta == 2);
    }

    #[test]
    fn self_comparison_has_no_differences(genome in ".{0,60}") {
        let diff = compare_genomes(&genome, &genome);
        prop_assert!(diff.differences.is_empty());
        prop_assert_eq!(diff.original_codon_count, diff.mutated_codon_count);
    }
}
