use std::fmt::Write;

use unicode_width::UnicodeWidthChar;

use super::*;

/// Text rendering of a document tree, for snapshots and debug logging.
///
/// ```text
/// Document 00000000-0000-0000-0000-000000000001
/// └─ Segmentation 00000000-0000-0000-0000-000000000002 (splitter @ 0)
///    ├─ Section 00000000-0000-0000-0000-000000000003 Passage #1
///    │  └─ Grouping 00000000-0000-0000-0000-000000000004
///    │     └─ Sentence 00000000-0000-0000-0000-000000000005 [0..10) "John left."
///    │        └─ Tokenization 00000000-0000-0000-0000-0000000003e8 (stanford @ 0) John left .
///    ...
/// EntitySet 00000000-0000-0000-0000-0000000003ec (stanford @ 0)
/// └─ Entity 00000000-0000-0000-0000-0000000003eb
///    └─ Mention 00000000-0000-0000-0000-0000000003ea -> 00000000-0000-0000-0000-0000000003e8 [0..1) "John"
/// ```
pub struct DocumentDisplay<'a> {
    doc: &'a Document,
    preview_width: usize,
    show_tokens: bool,
    show_entities: bool,
}

impl<'a> DocumentDisplay<'a> {
    pub fn new(doc: &'a Document) -> Self {
        DocumentDisplay {
            doc,
            preview_width: 40,
            show_tokens: true,
            show_entities: true,
        }
    }

    /// Maximum display width of sentence previews. Zero hides them.
    pub fn preview_width(mut self, width: usize) -> Self {
        self.preview_width = width;
        self
    }

    pub fn without_tokens(mut self) -> Self {
        self.show_tokens = false;
        self
    }

    pub fn without_entities(mut self) -> Self {
        self.show_entities = false;
        self
    }

    /// At most `preview_width` columns, the ellipsis included.
    fn preview(&self, text: &str) -> String {
        let chars: Vec<(char, usize)> = text
            .chars()
            .map(|ch| {
                let ch = if ch.is_whitespace() { ' ' } else { ch };
                (ch, UnicodeWidthChar::width(ch).unwrap_or(0))
            })
            .collect();
        if chars.iter().map(|(_, w)| w).sum::<usize>() <= self.preview_width {
            return chars.into_iter().map(|(ch, _)| ch).collect();
        }

        let budget = self.preview_width.saturating_sub(1);
        let mut out = String::new();
        let mut width = 0;
        for (ch, w) in chars {
            if width + w > budget {
                break;
            }
            width += w;
            out.push(ch);
        }
        out.push('…');
        out
    }

    /// Mention text, resolved through the tokenization it points at.
    fn mention_text(&self, tokens: &crate::TokenRefSequence) -> Option<String> {
        self.doc
            .segmentations
            .iter()
            .flat_map(|s| &s.sections)
            .flat_map(|s| &s.groupings)
            .flat_map(|g| &g.sentences)
            .flat_map(|s| &s.tokenizations)
            .find(|t| t.id == tokens.tokenization_id)
            .and_then(|t| t.annotations.token_text(tokens.start, tokens.end))
    }
}

fn branch(is_last: bool) -> (&'static str, &'static str) {
    if is_last {
        ("└─ ", "   ")
    } else {
        ("├─ ", "│  ")
    }
}

fn stamp(metadata: &AnnotationMetadata) -> String {
    format!("({} @ {})", metadata.tool, metadata.timestamp)
}

impl<'a> std::fmt::Display for DocumentDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Document {}", self.doc.id)?;

        let segmentations = &self.doc.segmentations;
        for (seg_idx, segmentation) in segmentations.iter().enumerate() {
            let (head, pad) = branch(seg_idx + 1 == segmentations.len());
            write!(
                f,
                "\n{}Segmentation {} {}",
                head,
                segmentation.id,
                stamp(&segmentation.metadata)
            )?;

            for (sec_idx, section) in segmentation.sections.iter().enumerate() {
                let (head, sec_pad) = branch(sec_idx + 1 == segmentation.sections.len());
                write!(f, "\n{}{}Section {}", pad, head, section.id)?;
                if let Some(kind) = section.kind {
                    write!(f, " {:?}", kind)?;
                }
                if let Some(number) = section.number {
                    write!(f, " #{}", number)?;
                }
                let pad = format!("{}{}", pad, sec_pad);

                for (grp_idx, grouping) in section.groupings.iter().enumerate() {
                    let (head, grp_pad) = branch(grp_idx + 1 == section.groupings.len());
                    write!(f, "\n{}{}Grouping {}", pad, head, grouping.id)?;
                    if let Some(metadata) = &grouping.metadata {
                        write!(f, " {}", stamp(metadata))?;
                    }
                    let pad = format!("{}{}", pad, grp_pad);

                    for (sent_idx, sentence) in grouping.sentences.iter().enumerate() {
                        let (head, sent_pad) = branch(sent_idx + 1 == grouping.sentences.len());
                        write!(
                            f,
                            "\n{}{}Sentence {} [{}..{})",
                            pad, head, sentence.id, sentence.span.start, sentence.span.end
                        )?;
                        if self.preview_width > 0 {
                            match self.doc.sentence_text(sentence) {
                                Some(text) => write!(f, " {:?}", self.preview(text))?,
                                None => f.write_str(" <span out of bounds>")?,
                            }
                        }
                        let pad = format!("{}{}", pad, sent_pad);

                        for (tok_idx, tokenization) in sentence.tokenizations.iter().enumerate() {
                            let (head, _) = branch(tok_idx + 1 == sentence.tokenizations.len());
                            write!(
                                f,
                                "\n{}{}Tokenization {} {}",
                                pad,
                                head,
                                tokenization.id,
                                stamp(&tokenization.metadata)
                            )?;
                            if self.show_tokens {
                                let mut words = String::new();
                                for token in &tokenization.annotations.tokens {
                                    write!(words, " {}", token.text)?;
                                }
                                f.write_str(&words)?;
                            }
                        }
                    }
                }
            }
        }

        if !self.show_entities {
            return Ok(());
        }

        for mention_set in &self.doc.entity_mention_sets {
            write!(
                f,
                "\nEntityMentionSet {} {} ({} mentions)",
                mention_set.id,
                stamp(&mention_set.metadata),
                mention_set.mentions.len()
            )?;
        }

        for entity_set in &self.doc.entity_sets {
            write!(f, "\nEntitySet {} {}", entity_set.id, stamp(&entity_set.metadata))?;
            for (ent_idx, entity) in entity_set.entities.iter().enumerate() {
                let (head, pad) = branch(ent_idx + 1 == entity_set.entities.len());
                write!(f, "\n{}Entity {}", head, entity.id)?;

                for (m_idx, mention_id) in entity.mention_ids.iter().enumerate() {
                    let (head, _) = branch(m_idx + 1 == entity.mention_ids.len());
                    write!(f, "\n{}{}Mention {}", pad, head, mention_id)?;

                    let mention = self
                        .doc
                        .entity_mention_sets
                        .iter()
                        .find_map(|set| set.mention(*mention_id));
                    match mention {
                        Some(mention) => {
                            let tokens = &mention.tokens;
                            write!(
                                f,
                                " -> {} [{}..{})",
                                tokens.tokenization_id, tokens.start, tokens.end
                            )?;
                            if let Some(text) = self.mention_text(tokens) {
                                write!(f, " {:?}", text)?;
                            }
                        }
                        None => f.write_str(" <dangling>")?,
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnnotationId;

    fn id(n: u128) -> AnnotationId {
        AnnotationId::from_u128(n)
    }

    fn sample() -> Document {
        let meta = AnnotationMetadata::new("splitter", 0);
        let sentence = Sentence::new(id(5), TextSpan::new(0, 10)).with_tokenization(Tokenization::new(
            id(6),
            AnnotationMetadata::new("tagger", 7),
            SentenceAnnotations::from_words(["John", "left", "."]),
        ));
        Document::new(id(1), "John left. Unrelated trailing text")
            .with_segmentation(Segmentation::new(
                id(2),
                meta,
                vec![
                    Section::new(id(3), vec![SentenceGrouping::new(id(4), vec![sentence])])
                        .with_kind(SectionKind::Passage)
                        .with_number(1),
                    Section::new(id(7), Vec::new()).with_kind(SectionKind::Metadata),
                ],
            ))
    }

    #[test]
    fn test_display_tree() {
        let doc = sample();
        insta::assert_snapshot!(doc.display().to_string(), @r###"
        Document 00000000-0000-0000-0000-000000000001
        └─ Segmentation 00000000-0000-0000-0000-000000000002 (splitter @ 0)
           ├─ Section 00000000-0000-0000-0000-000000000003 Passage #1
           │  └─ Grouping 00000000-0000-0000-0000-000000000004
           │     └─ Sentence 00000000-0000-0000-0000-000000000005 [0..10) "John left."
           │        └─ Tokenization 00000000-0000-0000-0000-000000000006 (tagger @ 7) John left .
           └─ Section 00000000-0000-0000-0000-000000000007 Metadata
        "###);
    }

    #[test]
    fn test_preview_never_exceeds_width() {
        let doc = sample();
        for width in 1..12 {
            let preview = doc.display().preview_width(width).preview("John left.\u{4e16}\u{754c}");
            let columns: usize = preview
                .chars()
                .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
                .sum();
            assert!(columns <= width, "{:?} at width {}", preview, width);
            assert!(preview.ends_with('…'));
        }
    }

    #[test]
    fn test_display_preview_truncates() {
        let doc = sample();
        let rendered = doc.display().preview_width(4).without_tokens().to_string();
        assert!(rendered.contains("\"Joh…\""), "{}", rendered);
        assert!(!rendered.contains("John left ."));

        let exact = doc.display().preview_width(10).without_tokens().to_string();
        assert!(exact.contains("\"John left.\""), "{}", exact);

        let hidden = doc.display().preview_width(0).to_string();
        assert!(!hidden.contains("\"John"));
    }
}
