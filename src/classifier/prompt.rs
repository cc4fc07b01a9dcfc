//! Instruction prompt for the classification request.

const TEMPLATE: &str = r#"You are an AI assistant tasked with classifying webpages for bookmark organization. Analyze the provided URL and title to determine a logical folder structure and relevant tags. Use emojis in folder names to make them visually distinct and intuitive. Follow these guidelines:

1. **Folder Structure**:
   - Create a folder path with 1-3 levels (e.g., ["📰 News", "🌍 Global"] or ["💻 Technology", "🖥️ Software", "🛠️ Tools"]).
   - Use simple, widely supported Unicode emojis (e.g., 📰, 💻, 🛒, 📚) at the start of each folder name.
   - Ensure folder names are concise, descriptive, and reflect the webpage's content or purpose.
   - Avoid nested folders deeper than 3 levels.

2. **Tags**:
   - Generate 2-5 concise, lowercase tags that describe the webpage's content, purpose, or category.
   - Tags should be specific and useful for searching (e.g., "coding" instead of "tech").

3. **Context**:
   - Infer the webpage's purpose from the URL and title (e.g., blog, e-commerce, news, social media, education).
   - Consider the domain (e.g., github.com → coding, amazon.com → shopping).

4. **Output**:
   - Respond with valid JSON only, containing "folderPath" (array of strings) and "tags" (array of strings).
   - Do not include markdown, code fences, or extra text.

**URL**: {url}
**Title**: {title}

**Examples**:
- URL: https://www.nytimes.com/politics, Title: "Election Updates"
  → {"folderPath": ["📰 News", "🌍 Global", "🗳️ Politics"], "tags": ["politics", "election", "news"]}
- URL: https://github.com/python, Title: "Python Repository"
  → {"folderPath": ["💻 Technology", "🖥️ Software", "🛠️ Coding"], "tags": ["coding", "python", "github"]}
- URL: https://www.amazon.com/electronics, Title: "Electronics Store"
  → {"folderPath": ["🛒 Shopping", "📱 Electronics"], "tags": ["shopping", "electronics", "amazon"]}
- URL: https://www.khanacademy.org/math, Title: "Math Lessons"
  → {"folderPath": ["📚 Education", "➗ Math"], "tags": ["education", "math", "learning"]}
- URL: https://www.reddit.com/r/science, Title: "Science Discussions"
  → {"folderPath": ["🌐 Social Media", "🔬 Science"], "tags": ["social", "science", "reddit"]}

**Response Format**:
{
  "folderPath": ["Emoji Category", "Emoji Subcategory", "Emoji Specific"],
  "tags": ["tag1", "tag2", "tag3"]
}"#;

/// Interpolates `url` and `title` into the classification prompt.
pub fn build_prompt(url: &str, title: &str) -> String {
    // Split at the placeholders instead of chained `replace` so a title containing
    // "{url}" is not interpolated twice.
    let (head, rest) = TEMPLATE.split_once("{url}").unwrap_or((TEMPLATE, ""));
    let (middle, tail) = rest.split_once("{title}").unwrap_or((rest, ""));
    let mut prompt = String::with_capacity(TEMPLATE.len() + url.len() + title.len());
    prompt.push_str(head);
    prompt.push_str(url);
    prompt.push_str(middle);
    prompt.push_str(title);
    prompt.push_str(tail);
    prompt
}
