use crate::model::{BookCode, Module, ModuleFlags, ModuleType};
use crate::store::memory::InMemoryStore;
use crate::store::{BookData, ModuleData, VerseData};

pub fn b(name: &str) -> BookCode {
    BookCode::from_name(name).expect("known book")
}

fn v(text: &str, strongs: &[&str]) -> VerseData {
    VerseData::new(text).with_strongs(strongs.iter().copied())
}

/// A small Bible with both testaments, Strong's annotations and headings.
///
/// Absolute layout: Gen 0..6 (two chapters of 3), Ps 6..8, John 8..11 (1:1-2, 2:1),
/// 1John 11..13.
pub fn sample_bible() -> ModuleData {
    let flags = ModuleFlags {
        has_strongs: true,
        has_headings: true,
        ..Default::default()
    };
    ModuleData::new(
        Module::new("KJV", ModuleType::Bible, "en")
            .with_description("King James Version (sample)")
            .with_flags(flags),
    )
    .with_book(
        BookData::new(b("Gen"))
            .with_introduction("The book of beginnings.")
            .with_chapter(vec![
                v(
                    "In the beginning God created the heaven and the earth.",
                    &["H7225", "H430", "H1254"],
                )
                .with_heading("The Creation"),
                v("And the earth was without form, and void.", &["H776"]),
                v(
                    "And God said, Let there be light: and there was light.",
                    &["H430", "H216"],
                ),
            ])
            .with_chapter(vec![
                v("Thus the heavens and the earth were finished.", &["H8064"])
                    .with_heading("The Seventh Day"),
                v("And on the seventh day God ended his work.", &["H430", "H7637"]),
                v("And God blessed the seventh day.", &["H430", "H1288"]),
            ]),
    )
    .with_book(BookData::new(b("Ps")).with_chapter(vec![
        v(
            "Blessed is the man that walketh not in the counsel of the ungodly.",
            &["H835"],
        ),
        v("But his delight is in the law of the LORD.", &["H3068"]),
    ]))
    .with_book(
        BookData::new(b("John"))
            .with_chapter(vec![
                v(
                    "In the beginning was the Word, and the Word was with God.",
                    &["G746", "G3056", "G2316"],
                ),
                v("The same was in the beginning with God.", &["G2316"]),
            ])
            .with_chapter(vec![v(
                "For God so loved the world.",
                &["G2316", "G25"],
            )]),
    )
    .with_book(BookData::new(b("1John")).with_chapter(vec![
        v(
            "He that loveth not knoweth not God; for God is love.",
            &["G26", "G2316"],
        ),
        v("Beloved, let us love one another.", &["G26"]),
    ]))
}

pub fn greek_lexicon() -> ModuleData {
    ModuleData::new(
        Module::new("StrongsGreek", ModuleType::Dictionary, "grc").with_flags(ModuleFlags {
            has_greek_strongs_keys: true,
            ..Default::default()
        }),
    )
    .with_entry(
        "00026",
        " 0026  agape  ag-ah'-pay\n\n from 0025; love, i.e. affection or benevolence;\n specially (plural) a love-feast:--(feast of) charity(-ably), dear, love.\n\n see GREEK for 0025\n",
    )
    .with_entry(
        "00025",
        " 0025  agapao  ag-ap-ah'-o\n\n perhaps from agan (much); to love (in a social or moral sense):--(be-)love(-ed).\n",
    )
    .with_entry("02316", " 2316  theos\n\n a deity, especially the supreme Divinity.\n")
    .with_entry(
        "04615",
        " 4615  sinapi  sin'-ap-ee\n\n perhaps from sinomai (to hurt, i.e. sting); mustard.\n",
    )
    .with_entry("09999", "\n   \n")
}

pub fn hebrew_lexicon() -> ModuleData {
    ModuleData::new(
        Module::new("StrongsHebrew", ModuleType::Dictionary, "hbo").with_flags(ModuleFlags {
            has_hebrew_strongs_keys: true,
            ..Default::default()
        }),
    )
    .with_entry(
        "00430",
        " 0430  'elohiym  el-o-heem'\n\n plural of 0433; gods in the ordinary sense;\n but specifically used of the supreme God.\n\n see HEBREW for 0433\n see HEBREW for 0410\n",
    )
}

/// `PLAIN`: a two-verse Genesis without Strong's numbers.
pub fn plain_bible() -> ModuleData {
    ModuleData::new(Module::new("PLAIN", ModuleType::Bible, "en")).with_book(
        BookData::new(b("Gen")).with_chapter(["In the beginning.", "Then the end."]),
    )
}

/// `LOCKED`: metadata is visible, content is not.
pub fn locked_bible() -> ModuleData {
    ModuleData::new(Module::new("LOCKED", ModuleType::Bible, "en"))
        .with_book(BookData::new(b("Gen")).with_chapter(["Secret."]))
        .locked()
}

/// The sample Bible plus lexicons, a locked module and a Bible without Strong's numbers.
pub fn sample_store() -> InMemoryStore {
    InMemoryStore::new()
        .with_module(sample_bible())
        .with_module(greek_lexicon())
        .with_module(hebrew_lexicon())
        .with_module(plain_bible())
        .with_module(locked_bible())
}
