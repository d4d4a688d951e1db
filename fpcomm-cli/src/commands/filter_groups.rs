use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use fpcomm_model::TagClassifier;

/// Print the content filter groups in priority order.
pub(crate) fn run_filter_groups(show_tags: bool) {
    let groups = TagClassifier::builtin().groups();

    log::info!("{}", "Content filter groups".if_supports_color(Stdout, |t| t.bold()));
    crate::log_blank();
    for group in groups {
        let marker = if group.extreme { "extreme" } else { "" };
        log::info!(
            "  {:<26} {:>4} tags  {}",
            group.name.if_supports_color(Stdout, |t| t.cyan()),
            group.tags.len(),
            marker.if_supports_color(Stdout, |t| t.red()),
        );
        if show_tags {
            log::info!(
                "    {}",
                group.tags.join(", ").if_supports_color(Stdout, |t| t.dimmed())
            );
        }
    }
    crate::log_blank();
    log::info!(
        "A tag counts toward the first group listed that contains it."
    );
}
