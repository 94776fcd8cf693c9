// Colored terminal output for frequency tables, similarity and topics.
//
// Pipeline stages print their headline results through these functions;
// the full tables go to CSV via `report`.

use colored::Colorize;

use crate::analyzer::correlation::RankCorrelation;
use crate::analyzer::frequency::DocumentStatistics;
use crate::insights::themes::DominantTopic;
use crate::insights::SimilarityMatrix;

/// Widest document label shown in matrix headers.
const LABEL_CHARS: usize = 18;

/// Display a ranked word-frequency table.
pub fn display_top_words(title: &str, words: &[(String, usize)], limit: usize) {
    if words.is_empty() {
        println!("No words to show for {title}.");
        return;
    }

    println!("\n{}", format!("=== {title} ===").bold());
    println!(
        "  {:>4}  {:<24} {:>8}",
        "Rank".dimmed(),
        "Word".dimmed(),
        "Count".dimmed()
    );
    println!("  {}", "-".repeat(40).dimmed());

    for (i, (word, count)) in words.iter().take(limit).enumerate() {
        let rank = format!("{:>4}.", i + 1);
        let rank = if i < 3 { rank.bold() } else { rank.normal() };
        println!("  {} {:<24} {:>8}", rank, word, count);
    }
}

/// Display one document's vocabulary statistics.
pub fn display_statistics(name: &str, stats: &DocumentStatistics) {
    println!(
        "  {:<28} {:>8} words  {:>7} unique  diversity {}",
        super::truncate_chars(name, 28),
        stats.total_words,
        stats.unique_words,
        colorize_ratio(stats.lexical_diversity)
    );
}

/// Display a pairwise similarity matrix.
pub fn display_similarity_matrix(matrix: &SimilarityMatrix) {
    println!(
        "\n{}",
        format!("=== Document Similarity ({}) ===", matrix.method).bold()
    );

    let labels: Vec<String> = matrix
        .names
        .iter()
        .map(|name| super::truncate_chars(name, LABEL_CHARS))
        .collect();

    print!("  {:<width$}", "", width = LABEL_CHARS + 4);
    for i in 0..labels.len() {
        print!(" {:>6}", format!("[{i}]").dimmed());
    }
    println!();

    for (i, (label, row)) in labels.iter().zip(&matrix.values).enumerate() {
        print!("  {:>3} {:<width$}", format!("[{i}]"), label, width = LABEL_CHARS);
        for (j, value) in row.iter().enumerate() {
            if i == j {
                print!(" {:>6}", "-".dimmed());
            } else {
                print!(" {:>6}", colorize_ratio(*value));
            }
        }
        println!();
    }
}

/// Display topics with their leading words.
pub fn display_topics(topics: &[Vec<String>]) {
    println!("\n{}", format!("=== Topics ({}) ===", topics.len()).bold());
    for (i, words) in topics.iter().enumerate() {
        println!("  {} {}", format!("Topic {i}:").cyan().bold(), words.join(", "));
    }
}

/// Display each document's dominant topic.
pub fn display_dominant_topics(dominant: &[DominantTopic]) {
    println!();
    for d in dominant {
        println!(
            "  {:<28} topic {} ({:.0}%)  {}",
            super::truncate_chars(&d.document, 28),
            d.topic_index,
            d.probability * 100.0,
            d.top_words.join(" ").dimmed()
        );
    }
}

/// Display pairwise Spearman correlations of shared word counts.
pub fn display_rank_correlations(correlations: &[(String, String, RankCorrelation)]) {
    if correlations.is_empty() {
        return;
    }
    println!("\n{}", "=== Word Rank Correlation ===".bold());
    for (a, b, rc) in correlations {
        let p = if rc.p_value < 0.05 {
            format!("p={:.3}", rc.p_value).green()
        } else {
            format!("p={:.3}", rc.p_value).dimmed()
        };
        println!(
            "  {} vs {}  rho={:+.3}  {}",
            super::truncate_chars(a, LABEL_CHARS),
            super::truncate_chars(b, LABEL_CHARS),
            rc.correlation,
            p
        );
    }
}

/// Colorize a value in [0, 1]: high green, middling yellow, low plain.
fn colorize_ratio(value: f64) -> colored::ColoredString {
    let text = format!("{value:.2}");
    if value >= 0.6 {
        text.green()
    } else if value >= 0.3 {
        text.yellow()
    } else {
        text.normal()
    }
}
