//! Test fixtures: a small course covering the exercise variants.

use lingua_core::Course;
use serde_json::json;

/// Two sections. In the first, `l1` (choice + fill-blank) and `lp` (pairs
/// board + conversation) start unlocked with `l2` between them locked; the
/// second section starts fully locked. `lp` is the section's last lesson,
/// so completing it exercises the cross-section unlock.
pub fn course() -> Course {
    serde_json::from_value(json!({
        "sections": [
            {
                "id": "s1",
                "title": "Basics",
                "description": "First steps",
                "lessons": [
                    {
                        "id": "l1",
                        "level": "A1",
                        "title": "Greetings",
                        "description": "Say hello",
                        "locked": false,
                        "completed": false,
                        "stars": 0,
                        "vocabulary": [
                            {
                                "headword": "Hello",
                                "translation": "Cześć",
                                "phonetic": "/həˈloʊ/",
                                "example": "Hello, my name is Anna.",
                                "example_translation": "Cześć, mam na imię Anna."
                            },
                            {
                                "headword": "Good morning",
                                "translation": "Dzień dobry",
                                "phonetic": "/ɡʊd ˈmɔːrnɪŋ/",
                                "example": "Good morning!",
                                "example_translation": "Dzień dobry!"
                            }
                        ],
                        "grammar": {
                            "topic": "The verb \"to be\"",
                            "explanation": "Use am, is, and are.",
                            "rules": [
                                { "rule": "I + am", "example": "I am Anna." }
                            ]
                        },
                        "exercises": [
                            {
                                "id": "e1",
                                "kind": "multiple_choice",
                                "prompt": "How do you say \"Cześć\" in English?",
                                "options": ["Hello", "Goodbye"],
                                "answer": "Hello"
                            },
                            {
                                "id": "e2",
                                "kind": "fill_blank",
                                "prompt": "I have ___ apple.",
                                "answer": ["a", "an"]
                            }
                        ]
                    },
                    {
                        "id": "l2",
                        "level": "A1",
                        "title": "Numbers",
                        "description": "Count to ten",
                        "locked": true,
                        "completed": false,
                        "stars": 0,
                        "exercises": [
                            {
                                "id": "n1",
                                "kind": "multiple_choice",
                                "prompt": "\"dwa\" means...",
                                "options": ["one", "two"],
                                "answer": "two"
                            }
                        ]
                    },
                    {
                        "id": "lp",
                        "level": "A1",
                        "title": "Matching",
                        "description": "Pairs and conversation",
                        "locked": false,
                        "completed": false,
                        "stars": 0,
                        "exercises": [
                            {
                                "id": "p1",
                                "kind": "match_pairs",
                                "prompt": "Match the words",
                                "options": ["dog", "pies", "cat", "kot"],
                                "answer": { "dog": "pies", "cat": "kot" }
                            },
                            {
                                "id": "c1",
                                "kind": "conversation",
                                "prompt": "Introduce yourself"
                            }
                        ]
                    }
                ]
            },
            {
                "id": "s2",
                "title": "Daily Life",
                "description": "Food and drink",
                "lessons": [
                    {
                        "id": "l3",
                        "level": "A1",
                        "title": "Food",
                        "description": "Order in a café",
                        "locked": true,
                        "completed": false,
                        "stars": 0,
                        "exercises": []
                    }
                ]
            }
        ]
    }))
    .expect("valid test course")
}
