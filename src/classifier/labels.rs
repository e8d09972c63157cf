/// Label under which the empathy classifier reports an empathetic reply.
pub const EMPATHETIC: &str = "empathetic";

pub const EMOTION_ANCHORS: &[(&str, &[&str])] = &[
    (
        "anger",
        &[
            "I am furious about this.",
            "This is outrageous and makes me so angry.",
            "I'm fed up, this is unacceptable!",
        ],
    ),
    (
        "disgust",
        &[
            "That is disgusting.",
            "I find this revolting and gross.",
            "Ugh, that makes me sick.",
        ],
    ),
    (
        "fear",
        &[
            "I'm scared something bad will happen.",
            "I am worried and anxious about this.",
            "This frightens me, I don't feel safe.",
        ],
    ),
    (
        "joy",
        &[
            "I'm so happy, this is wonderful!",
            "Thank you, that made my day.",
            "Great news, I'm delighted.",
        ],
    ),
    (
        "neutral",
        &[
            "What time does the store open?",
            "Please send me the invoice.",
            "I would like to change my address.",
        ],
    ),
    (
        "sadness",
        &[
            "I feel really sad and down.",
            "I'm heartbroken about what happened.",
            "This is disappointing and makes me unhappy.",
        ],
    ),
    (
        "surprise",
        &[
            "Wow, I did not expect that!",
            "Really? That's surprising.",
            "I can't believe it, what a shock.",
        ],
    ),
];

pub const EMPATHY_ANCHORS: &[(&str, &[&str])] = &[
    (
        EMPATHETIC,
        &[
            "User said: I'm really stressed about this. Assistant replied: I'm sorry you're dealing with that, it sounds stressful. Let's sort it out together.",
            "User said: My order never arrived and I needed it. Assistant replied: I completely understand how frustrating that must be. I'll make this right for you.",
            "User said: I lost my job this week. Assistant replied: That sounds really hard, and I'm here to help however I can.",
        ],
    ),
    (
        "not_empathetic",
        &[
            "User said: I'm really stressed about this. Assistant replied: Submit a ticket.",
            "User said: My order never arrived and I needed it. Assistant replied: Order status: shipped.",
            "User said: I lost my job this week. Assistant replied: That is not relevant to this service.",
        ],
    ),
];
