//! Built-in content so a fresh deployment has a quiz and a lesson theme to show.

use crate::config::{QuestionCfg, VideoCfg};

pub fn seed_questions() -> Vec<QuestionCfg> {
  vec![
    QuestionCfg {
      quiz_name: "Nature".into(),
      quiz_question: "What is photosynthesis?".into(),
      options: [
        "Process by which plants make food using sunlight".into(),
        "Process of breathing in animals".into(),
        "Movement of water in oceans".into(),
        "Breaking down of rocks".into(),
      ],
      correct_answer: "1".into(),
    },
    QuestionCfg {
      quiz_name: "Nature".into(),
      quiz_question: "Which gas do plants absorb from the atmosphere?".into(),
      options: ["Oxygen".into(), "Nitrogen".into(), "Carbon Dioxide".into(), "Hydrogen".into()],
      correct_answer: "3".into(),
    },
    QuestionCfg {
      quiz_name: "Nature".into(),
      quiz_question: "Which is the largest ecosystem on Earth?".into(),
      options: ["Forest".into(), "Desert".into(), "Freshwater".into(), "Marine".into()],
      correct_answer: "4".into(),
    },
  ]
}

pub fn seed_videos() -> Vec<VideoCfg> {
  vec![
    VideoCfg {
      title: "Plastic Bag Story".into(),
      theme: "victims".into(),
      description: Some(
        "A personal account highlighting the environmental and human cost of plastic bags.".into(),
      ),
      thumbnail: Some("plastic_bag_thumbnail.png".into()),
      video: Some("A_Plastic_Bags_Secret_.mp4".into()),
      video_url: None,
    },
    VideoCfg {
      title: "Tragedy of Water Bottle".into(),
      theme: "victims".into(),
      description: Some("A tragic story centered around a discarded water bottle and its aftermath.".into()),
      thumbnail: Some("bottle.png".into()),
      video: Some("VID-20250926-WA0010.mp4".into()),
      video_url: None,
    },
  ]
}
