// Prompt composition module
//
// Static component tables plus a draw function that picks one subject,
// style and atmosphere from an injected random source. Keeping the RNG
// a parameter makes composition fully deterministic under test.

use rand::Rng;

/// A prompt subject: the scene description plus the location labels
/// shown in the post caption (native script and Latin).
#[derive(Debug, Clone, Copy)]
pub struct Subject {
    pub scene: &'static str,
    pub location_native: &'static str,
    pub location_latin: &'static str,
}

/// Immutable prompt value, composed once per run.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub subject: &'static str,
    pub location_native: &'static str,
    pub location_latin: &'static str,
    pub style: &'static str,
    pub atmosphere: &'static str,
}

impl Prompt {
    /// Full prompt text sent to the generation API.
    pub fn text(&self) -> String {
        format!(
            "{}, {}, {}, masterpiece, trending on artstation.",
            self.subject, self.atmosphere, self.style
        )
    }
}

/// Draw a random prompt from the component tables.
pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Prompt {
    let subject = &SUBJECTS[rng.gen_range(0..SUBJECTS.len())];
    let style = STYLES[rng.gen_range(0..STYLES.len())];
    let atmosphere = ATMOSPHERES[rng.gen_range(0..ATMOSPHERES.len())];

    Prompt {
        subject: subject.scene,
        location_native: subject.location_native,
        location_latin: subject.location_latin,
        style,
        atmosphere,
    }
}

pub const SUBJECTS: &[Subject] = &[
    // Iran
    Subject {
        scene: "The majestic ruins of Persepolis (Takht-e Jamshid) at sunset, ancient Persian architecture, stone columns, dramatic lighting",
        location_native: "تخت جمشید",
        location_latin: "Persepolis, Iran",
    },
    Subject {
        scene: "The Ziggurat of Chogha Zanbil, ancient Elamite complex, brick texture, golden hour sunlight, historical atmosphere",
        location_native: "زیگورات چغازنبیل",
        location_latin: "Chogha Zanbil, Iran",
    },
    Subject {
        scene: "The ancient Arg-e Bam citadel, massive adobe fortress, desert sunset, intricate mudbrick details",
        location_native: "ارگ بم",
        location_latin: "Arg-e Bam, Iran",
    },
    Subject {
        scene: "Naqsh-e Jahan Square in Isfahan, turquoise domes of Imam Mosque, Ali Qapu Palace, reflection in the central pool",
        location_native: "میدان نقش جهان",
        location_latin: "Naqsh-e Jahan Sq, Isfahan",
    },
    Subject {
        scene: "Si-o-se-pol bridge in Isfahan at night, illuminated arches reflecting in the Zayandeh Rood river, romantic atmosphere",
        location_native: "سی‌وسه‌پل",
        location_latin: "Si-o-se-pol, Isfahan",
    },
    Subject {
        scene: "Mount Damavand covered in snow, volcanic peak rising above clouds, wild poppies in foreground, majestic view",
        location_native: "کوه دماوند",
        location_latin: "Mount Damavand, Iran",
    },
    Subject {
        scene: "Nasir al-Mulk Mosque (Pink Mosque) in Shiraz, morning light through stained glass, colorful patterns on carpet",
        location_native: "مسجد نصیرالملک",
        location_latin: "Pink Mosque, Shiraz",
    },
    Subject {
        scene: "The Kaluts of Shahdad Desert (Lut Desert) at sunrise, strange sand formations, vast landscape, national geographic style",
        location_native: "کلوت‌های شهداد",
        location_latin: "Lut Desert, Iran",
    },
    Subject {
        scene: "Tabatabaei Historical House in Kashan, traditional Persian architecture, stained glass, courtyard with pool",
        location_native: "خانه طباطبایی‌ها",
        location_latin: "Tabatabaei House, Kashan",
    },
    // Asia
    Subject {
        scene: "Angkor Wat temple complex in Cambodia at sunrise, reflection in lotus pond, ancient stone carvings, mystical mist",
        location_native: "انگکور وات",
        location_latin: "Angkor Wat, Cambodia",
    },
    Subject {
        scene: "Limestone karsts of Ha Long Bay in Vietnam, emerald waters, traditional junk boat sailing, misty mountains",
        location_native: "خلیج ها لونگ",
        location_latin: "Ha Long Bay, Vietnam",
    },
    Subject {
        scene: "Fushimi Inari Taisha shrine in Kyoto Japan, path of thousands of red torii gates, forest background",
        location_native: "معبد فوشیمی ایناری",
        location_latin: "Fushimi Inari, Japan",
    },
    Subject {
        scene: "The Great Wall of China winding through autumn mountains, sunrise, ancient fortification, majestic view",
        location_native: "دیوار بزرگ چین",
        location_latin: "Great Wall of China",
    },
    Subject {
        scene: "Gardens by the Bay in Singapore, Supertree Grove at night, neon lights, futuristic garden, lush greenery",
        location_native: "باغ‌های خلیج",
        location_latin: "Gardens by the Bay, Singapore",
    },
    Subject {
        scene: "The ancient temples of Bagan in Myanmar, hot air balloons floating at sunrise, golden pagodas, dreamy atmosphere",
        location_native: "معابد باگان",
        location_latin: "Bagan, Myanmar",
    },
    Subject {
        scene: "The Forbidden City in Beijing, snow covering golden roofs, intricate red palace details, imperial history",
        location_native: "شهر ممنوعه",
        location_latin: "Forbidden City, China",
    },
    Subject {
        scene: "Mount Fuji with cherry blossoms (Sakura) in the foreground, lake reflection, snow-capped peak, serene",
        location_native: "کوه فوجی",
        location_latin: "Mount Fuji, Japan",
    },
    Subject {
        scene: "The Taj Mahal in India, white marble mausoleum, symmetrical reflection, soft morning mist, iconic landmark",
        location_native: "تاج محل",
        location_latin: "Taj Mahal, India",
    },
    Subject {
        scene: "Petra in Jordan, The Treasury (Al-Khazneh) carved into red sandstone cliff, dramatic shadows, desert canyon",
        location_native: "پترا",
        location_latin: "Petra, Jordan",
    },
    Subject {
        scene: "Arashiyama Bamboo Grove in Kyoto, towering green bamboo stalks, sunlight filtering through, path leading forward",
        location_native: "جنگل بامبو آراشیاما",
        location_latin: "Bamboo Grove, Japan",
    },
    // General beautiful locations
    Subject {
        scene: "A cozy rainy street in Paris at night, reflection on wet cobblestones, glowing cafe lights",
        location_native: "خیابان بارانی در پاریس",
        location_latin: "Paris, France",
    },
    Subject {
        scene: "Santorini, Greece, white buildings with blue domes, vibrant pink bougainvillea flowers, Aegean Sea view",
        location_native: "سانتورینی",
        location_latin: "Santorini, Greece",
    },
    Subject {
        scene: "Venice canals at sunset, gondola, old architecture, reflection in water, romantic atmosphere",
        location_native: "ونیز",
        location_latin: "Venice, Italy",
    },
    Subject {
        scene: "A futuristic cyberpunk city street, neon signs, rain, flying cars, high tech architecture",
        location_native: "شهر سایبرپانک",
        location_latin: "Cyberpunk City",
    },
    Subject {
        scene: "A mystical library with floating books, dust motes dancing in light beams, fantasy art style",
        location_native: "کتابخانه جادویی",
        location_latin: "Magical Library",
    },
];

pub const STYLES: &[&str] = &[
    "cinematic lighting, photorealistic, 8k",
    "digital art, vibrant colors, sharp focus",
    "oil painting style, textured brushstrokes, artistic",
    "watercolor painting, soft edges, dreamy",
    "cyberpunk style, neon lights, high contrast",
    "studio photography, professional lighting, crisp details",
    "anime style, makoto shinkai aesthetic, highly detailed",
    "vintage polaroid style, nostalgic, film grain",
    "concept art, fantasy style, epic composition",
    "national geographic style, nature photography",
];

pub const ATMOSPHERES: &[&str] = &[
    "during a golden sunset",
    "under a dramatic stormy sky",
    "in the early morning mist",
    "at night with a bright full moon",
    "during a heavy rain shower",
    "bathed in soft warm sunlight",
    "in a snowy winter blizzard",
    "during the blue hour",
    "with dramatic shadows and light beams",
    "under the northern lights",
];
