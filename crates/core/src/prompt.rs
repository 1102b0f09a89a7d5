use crate::project::ProjectSummary;

/// Application name used when none is given.
pub const DEFAULT_APP_NAME: &str = "simple-legacy-app";

/// Instructions attached to the run itself.
pub const RUN_INSTRUCTIONS: &str = "Respond with only the Dockerfile content.";

/// Build the user message asking the agent for a Dockerfile.
///
/// The project summary is embedded as 2-space indented JSON after the
/// requirements list.
pub fn build_prompt(
    summary: &ProjectSummary,
    app_name: &str,
) -> Result<String, serde_json::Error> {
    let summary_json = serde_json::to_string_pretty(summary)?;

    Ok(format!(
        "
You are a DevOps agent. Generate a production-ready Dockerfile for a legacy Java servlet application.
Requirements:
- Use multi-stage build (Maven build stage + Tomcat runtime stage)
- Build stage: Use maven:3.8-jdk-8 to build the WAR file
- Runtime stage: Use tomcat:9-jre8-alpine for smaller image
- Copy pom.xml and source code, run mvn clean package
- Copy the WAR file from target/{app_name}.war to Tomcat webapps/
- EXPOSE 8080
- The app runs on Tomcat, accessible at http://localhost:8080/{app_name}/hello
Provide ONLY the Dockerfile content, no explanations or markdown code fences.
Repo summary: {summary_json}
"
    ))
}
